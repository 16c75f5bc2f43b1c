// handlers/mod.rs - Request handlers grouped by the cookie they require
//
// Public:  /register, /login, /logout, /stores/:owner_id, /, /health
// Account: /account*, guarded by the `token` cookie
// Store:   /store/items*, guarded by the `store_token` cookie

pub mod account;
pub mod health;
pub mod item;
pub mod store;

use crate::error::ApiError;

/// Parse a numeric path or query id; anything else is a bad request.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| {
        tracing::debug!("Rejected non-numeric id {:?}", raw);
        ApiError::BadRequest
    })
}
