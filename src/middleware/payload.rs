use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::validation::Validate;

/// JSON body that has been parsed and validated.
///
/// Unreadable or unparseable bodies are rejected with 422, bodies that parse
/// but fail validation with 400.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Unreadable request body: {}", e);
            ApiError::UnprocessableEntity
        })?;

        let value: T = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!("Malformed JSON payload: {}", e);
            ApiError::UnprocessableEntity
        })?;

        value.validate().map_err(|errors| {
            tracing::debug!(?errors, "Payload failed validation");
            ApiError::BadRequest
        })?;

        Ok(Payload(value))
    }
}
