// handlers/account.rs - /register, /login, /logout and /account handlers

use axum::{
    extract::{Extension, State},
    response::{IntoResponse, Response},
};

use crate::auth::{ACCOUNT_COOKIE, STORE_COOKIE};
use crate::database::models::{Account, AccountInput, LoginInput};
use crate::error::ApiError;
use crate::middleware::{
    error_with_cookies, ApiResponse, ApiResult, AuthAccount, Payload, SessionCookie,
};
use crate::state::AppState;

/// POST /register - create an account, returned without its password
pub async fn register(
    State(state): State<AppState>,
    Payload(input): Payload<AccountInput>,
) -> ApiResult<Account> {
    let account = state.accounts.register(input).await?;
    Ok(ApiResponse::created(account))
}

/// POST /login - verify credentials and set the `token` cookie.
/// Any failure clears a previously set `token` cookie.
pub async fn login(State(state): State<AppState>, Payload(input): Payload<LoginInput>) -> Response {
    match state.accounts.login(input).await {
        Ok((account, token)) => ApiResponse::success(account)
            .with_cookie(SessionCookie::new(ACCOUNT_COOKIE, token, state.cookie_secure))
            .into_response(),
        Err(e) => error_with_cookies(
            ApiError::from(e),
            &[SessionCookie::clear(ACCOUNT_COOKIE, state.cookie_secure)],
        ),
    }
}

/// POST /logout - drop both session cookies
pub async fn logout(State(state): State<AppState>) -> ApiResponse<&'static str> {
    ApiResponse::success("Success Logout")
        .with_cookie(SessionCookie::clear(ACCOUNT_COOKIE, state.cookie_secure))
        .with_cookie(SessionCookie::clear(STORE_COOKIE, state.cookie_secure))
}

/// GET /account - the caller's own account
pub async fn read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
) -> ApiResult<Account> {
    let account = state.accounts.read_one(auth.id).await?;
    Ok(ApiResponse::success(account))
}

/// PATCH /account/update - overwrite the caller's account
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Payload(input): Payload<AccountInput>,
) -> ApiResult<Account> {
    let account = state.accounts.update(auth.id, input).await?;
    Ok(ApiResponse::success(account))
}

/// DELETE /account - remove the caller's account and end the session
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
) -> ApiResult<&'static str> {
    let message = state.accounts.delete(auth.id).await?;
    Ok(ApiResponse::success(message)
        .with_cookie(SessionCookie::clear(ACCOUNT_COOKIE, state.cookie_secure))
        .with_cookie(SessionCookie::clear(STORE_COOKIE, state.cookie_secure)))
}
