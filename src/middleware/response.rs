use axum::{
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use super::cookie::SessionCookie;
use crate::error::ApiError;

/// Wrapper for API responses that adds the `{status, data}` envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: StatusCode,
    pub cookies: Vec<SessionCookie>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with 200 status
    pub fn success(data: T) -> Self {
        Self::with_status(data, StatusCode::OK)
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            status_code,
            cookies: Vec::new(),
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self::with_status(data, StatusCode::CREATED)
    }

    /// Attach a `Set-Cookie` header
    pub fn with_cookie(mut self, cookie: SessionCookie) -> Self {
        self.cookies.push(cookie);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return ApiError::InternalServerError.into_response();
            }
        };

        let envelope = json!({
            "status": self.status_code.as_u16(),
            "data": data_value
        });

        let mut response = (self.status_code, Json(envelope)).into_response();
        append_cookies(&mut response, &self.cookies);
        response
    }
}

/// Error response that also sets cookies, e.g. clearing a rejected session.
pub fn error_with_cookies(error: ApiError, cookies: &[SessionCookie]) -> Response {
    let mut response = error.into_response();
    append_cookies(&mut response, cookies);
    response
}

fn append_cookies(response: &mut Response, cookies: &[SessionCookie]) {
    for cookie in cookies {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!("Dropping unencodable cookie {}: {}", cookie.name(), e),
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn success_wraps_data_in_envelope() {
        let response = ApiResponse::success(json!({ "id": 1 })).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(response).await, json!({ "status": 200, "data": { "id": 1 } }));
    }

    #[tokio::test]
    async fn created_reports_201_in_body_and_status() {
        let response = ApiResponse::created("made").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body(response).await["status"], 201);
    }

    #[tokio::test]
    async fn cookies_become_set_cookie_headers() {
        let response = ApiResponse::success(())
            .with_cookie(SessionCookie::new("token", "a", false))
            .with_cookie(SessionCookie::clear("store_token", false))
            .into_response();

        let cookies: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("token=a;"));
        assert!(cookies[1].ends_with("Max-Age=0"));
    }

    #[tokio::test]
    async fn error_with_cookies_keeps_error_envelope() {
        let response =
            error_with_cookies(ApiError::Unauthorized, &[SessionCookie::clear("token", false)]);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(SET_COOKIE));
        assert_eq!(body(response).await, json!({ "status": 401, "error": "unauthorized" }));
    }
}
