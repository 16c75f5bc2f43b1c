// handlers/store.rs - /account/store and /stores/:owner_id handlers

use axum::extract::{Extension, Path, Query, State};
use serde::Deserialize;

use super::parse_id;
use crate::auth::STORE_COOKIE;
use crate::database::models::{Store, StoreInput};
use crate::middleware::{ApiResponse, ApiResult, AuthAccount, Payload, SessionCookie};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StoreSelection {
    pub id: Option<String>,
}

/// POST /account/store - create a store owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Payload(input): Payload<StoreInput>,
) -> ApiResult<Store> {
    let store = state.stores.create_store(auth.id, input).await?;
    Ok(ApiResponse::created(store))
}

/// GET /account/store[?id=N] - list the caller's stores and set the
/// `store_token` cookie for the selected (default: first) store
pub async fn read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Query(selection): Query<StoreSelection>,
) -> ApiResult<Vec<Store>> {
    let selected = selection.id.as_deref().map(parse_id).transpose()?;
    let (stores, token) = state.stores.read(&auth.claims, selected).await?;

    Ok(ApiResponse::success(stores)
        .with_cookie(SessionCookie::new(STORE_COOKIE, token, state.cookie_secure)))
}

/// PATCH /account/store/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(id): Path<String>,
    Payload(input): Payload<StoreInput>,
) -> ApiResult<Store> {
    let id = parse_id(&id)?;
    let store = state.stores.update_store(id, auth.id, input).await?;
    Ok(ApiResponse::success(store))
}

/// DELETE /account/store/:id - also clears the store cookie
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(id): Path<String>,
) -> ApiResult<&'static str> {
    let id = parse_id(&id)?;
    let message = state.stores.delete_store(id, auth.id).await?;
    Ok(ApiResponse::success(message)
        .with_cookie(SessionCookie::clear(STORE_COOKIE, state.cookie_secure)))
}

/// GET /stores/:owner_id - public listing, no cookie issued
pub async fn list_public(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> ApiResult<Vec<Store>> {
    let owner_id = parse_id(&owner_id)?;
    let stores = state.stores.list_for_owner(owner_id).await?;
    Ok(ApiResponse::success(stores))
}
