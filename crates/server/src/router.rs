//! HTTP router construction.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use ladle_core::config::ServerConfig;

use crate::api;
use crate::state::AppState;

/// Build the application router with CORS applied.
pub fn build_router(state: Arc<AppState>, server: &ServerConfig) -> Router {
    Router::new()
        .route("/query", post(api::query))
        .route("/health", get(api::health))
        .route("/stats", get(api::stats))
        .layer(cors_layer(server))
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server
        .origin_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("ignoring unparseable CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
