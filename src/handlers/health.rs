// handlers/health.rs - GET / and GET /health

use axum::extract::State;
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - service name and version
pub async fn root() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health - 503 when the database does not answer
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let database = match &state.pool {
        Some(pool) => {
            DatabaseManager::health_check(pool).await.map_err(|e| {
                tracing::error!("Health check failed: {}", e);
                ApiError::ServiceUnavailable
            })?;
            "connected"
        }
        None => "in-memory",
    };

    Ok(ApiResponse::success(json!({ "healthy": true, "database": database })))
}
