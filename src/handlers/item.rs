// handlers/item.rs - /store/items handlers, all scoped to the store token

use axum::extract::{Extension, Path, State};

use super::parse_id;
use crate::database::models::{Item, ItemInput};
use crate::middleware::{ApiResponse, ApiResult, AuthStore, Payload};
use crate::services::ItemAdded;
use crate::state::AppState;

/// POST /store/items - 201 for a new item, 200 when an existing one was restocked
pub async fn add(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthStore>,
    Payload(input): Payload<ItemInput>,
) -> ApiResult<Item> {
    match state.items.add_item(auth.store_id, auth.owner_id, input).await? {
        ItemAdded::Created(item) => Ok(ApiResponse::created(item)),
        ItemAdded::Restocked(item) => Ok(ApiResponse::success(item)),
    }
}

/// GET /store/items
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthStore>,
) -> ApiResult<Vec<Item>> {
    let items = state.items.get_all_items(auth.store_id).await?;
    Ok(ApiResponse::success(items))
}

/// GET /store/items/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthStore>,
    Path(id): Path<String>,
) -> ApiResult<Item> {
    let id = parse_id(&id)?;
    let item = state.items.get_one_item(id, auth.store_id).await?;
    Ok(ApiResponse::success(item))
}

/// PATCH /store/items/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthStore>,
    Path(id): Path<String>,
    Payload(input): Payload<ItemInput>,
) -> ApiResult<Item> {
    let id = parse_id(&id)?;
    let item = state.items.update_item(id, auth.store_id, input).await?;
    Ok(ApiResponse::success(item))
}

/// DELETE /store/items/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthStore>,
    Path(id): Path<String>,
) -> ApiResult<&'static str> {
    let id = parse_id(&id)?;
    let message = state.items.delete_item(id, auth.store_id).await?;
    Ok(ApiResponse::success(message))
}
