use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use super::cookie::read_cookie;
use crate::auth::{Claims, TokenScope, ACCOUNT_COOKIE, STORE_COOKIE};
use crate::error::ApiError;
use crate::state::AppState;

/// Caller authenticated by an account token
#[derive(Clone, Debug)]
pub struct AuthAccount {
    pub id: i64,
    pub claims: Claims,
}

/// Caller authenticated by a store-scoped token
#[derive(Clone, Debug)]
pub struct AuthStore {
    pub store_id: i64,
    pub owner_id: i64,
}

/// Requires a valid account token in the `token` cookie
pub async fn require_account(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = verify_cookie(&state, request.headers(), ACCOUNT_COOKIE)?;

    match claims.scope() {
        TokenScope::Account { account_id } => {
            request.extensions_mut().insert(AuthAccount { id: account_id, claims });
            Ok(next.run(request).await)
        }
        TokenScope::Store { .. } => {
            tracing::warn!("Store token presented on an account route");
            Err(ApiError::Unauthorized)
        }
    }
}

/// Requires a valid store token in the `store_token` cookie
pub async fn require_store(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = verify_cookie(&state, request.headers(), STORE_COOKIE)?;

    match claims.scope() {
        TokenScope::Store { store_id, owner_id } => {
            request.extensions_mut().insert(AuthStore { store_id, owner_id });
            Ok(next.run(request).await)
        }
        TokenScope::Account { .. } => {
            tracing::warn!("Account token presented on a store route");
            Err(ApiError::Unauthorized)
        }
    }
}

fn verify_cookie(state: &AppState, headers: &HeaderMap, name: &str) -> Result<Claims, ApiError> {
    let token = read_cookie(headers, name).ok_or_else(|| {
        tracing::debug!("Missing {} cookie", name);
        ApiError::Unauthorized
    })?;

    state.tokens.verify(&token).map_err(|e| {
        tracing::warn!("Rejected {} cookie: {}", name, e);
        ApiError::Unauthorized
    })
}
