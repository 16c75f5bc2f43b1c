use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{account, health, item, store};
use crate::middleware::{require_account, require_store};
use crate::state::AppState;

/// Build the full HTTP application
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(public_routes())
        // Guarded by the `token` cookie
        .merge(account_routes(state.clone()))
        // Guarded by the `store_token` cookie
        .merge(item_routes(state.clone()))
        .with_state(state)
        .layer(cors_layer(&config.security.cors_origins));

    if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(account::register))
        .route("/login", post(account::login))
        .route("/logout", post(account::logout))
        .route("/stores/:owner_id", get(store::list_public))
}

fn account_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/account", get(account::read).delete(account::delete))
        .route("/account/update", patch(account::update))
        .route("/account/store", post(store::create).get(store::read))
        .route("/account/store/:id", patch(store::update).delete(store::delete))
        .route_layer(from_fn_with_state(state, require_account))
}

fn item_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/store/items", post(item::add).get(item::list))
        .route(
            "/store/items/:id",
            get(item::get).patch(item::update).delete(item::delete),
        )
        .route_layer(from_fn_with_state(state, require_store))
}

/// Permissive when no origins are configured; otherwise an explicit
/// allow-list with credentials so browsers send the session cookies.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}
