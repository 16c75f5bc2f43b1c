//! Use-cases: business rules on top of the repositories and token service.
//!
//! Every operation follows lookup-then-act. A failed lookup short-circuits
//! with a typed error; any other persistence or crypto fault is logged here
//! and collapsed to `ServiceError::Internal`.

pub mod account_service;
pub mod item_service;
pub mod store_service;

pub use account_service::AccountService;
pub use item_service::{ItemAdded, ItemService};
pub use store_service::StoreService;

use thiserror::Error;

use crate::auth::{PasswordError, TokenError};
use crate::database::DatabaseError;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("value out of range")]
    OutOfRange,

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal error")]
    Internal,
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(_) => ServiceError::NotFound,
            DatabaseError::Conflict(_) => ServiceError::Conflict,
            DatabaseError::OutOfRange(_) => ServiceError::OutOfRange,
            other => {
                // Log the real error but return generic message
                tracing::error!("Database error: {}", other);
                ServiceError::Internal
            }
        }
    }
}

impl From<TokenError> for ServiceError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid(_) => ServiceError::Unauthorized,
            other => {
                tracing::error!("Token error: {}", other);
                ServiceError::Internal
            }
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        tracing::error!("Password hashing error: {}", err);
        ServiceError::Internal
    }
}

/// Turn a `NotFound` lookup into `None`, keeping every other error.
pub(crate) fn optional<T>(result: Result<T, DatabaseError>) -> Result<Option<T>, DatabaseError> {
    match result {
        Ok(row) => Ok(Some(row)),
        Err(DatabaseError::NotFound(_)) => Ok(None),
        Err(other) => Err(other),
    }
}
