//! Route definitions for the coordinator's HTTP API.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_size_bytes as usize;

    // The external editor calls these cross-origin; it gets a wildcard.
    let document_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let document_routes = Router::new()
        .route(
            "/documents/download_for_editor",
            get(handlers::documents::download_for_editor)
                .post(handlers::documents::download_for_editor),
        )
        .route(
            "/documents/save_document",
            post(handlers::documents::save_document),
        )
        .route(
            "/documents/close_session",
            post(handlers::documents::close_session),
        )
        .route(
            "/documents/get_editor_config",
            get(handlers::documents::get_editor_config),
        )
        .layer(document_cors);

    let health_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed));

    Router::new()
        .merge(document_routes)
        .merge(health_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
