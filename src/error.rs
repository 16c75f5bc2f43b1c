// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::services::ServiceError;

/// HTTP API error with appropriate status codes and client-friendly messages.
///
/// Messages are static on purpose: no SQL text, hash details or token
/// internals ever reach the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request - payload parsed but failed validation
    BadRequest,

    // 401 Unauthorized - missing/invalid/expired token or wrong password
    Unauthorized,

    // 404 Not Found
    NotFound,

    // 409 Conflict
    Conflict,

    // 422 Unprocessable Entity - payload could not be parsed at all
    UnprocessableEntity,

    // 500 Internal Server Error
    InternalServerError,

    // 503 Service Unavailable
    ServiceUnavailable,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest => 400,
            ApiError::Unauthorized => 401,
            ApiError::NotFound => 404,
            ApiError::Conflict => 409,
            ApiError::UnprocessableEntity => 422,
            ApiError::InternalServerError => 500,
            ApiError::ServiceUnavailable => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest => "bad request",
            ApiError::Unauthorized => "unauthorized",
            ApiError::NotFound => "not found",
            ApiError::Conflict => "conflict",
            ApiError::UnprocessableEntity => "unprocessable entity",
            ApiError::InternalServerError => "internal server error",
            ApiError::ServiceUnavailable => "service unavailable",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "status": self.status_code(),
            "error": self.message(),
        })
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::Conflict => ApiError::Conflict,
            ServiceError::OutOfRange => ApiError::BadRequest,
            ServiceError::Unauthorized => ApiError::Unauthorized,
            // Cause was already logged where the ServiceError was built
            ServiceError::Internal => ApiError::InternalServerError,
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
