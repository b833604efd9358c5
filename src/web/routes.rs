//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Search bar sessions
        .route("/sessions", axum::routing::post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_snapshot).delete(handlers::delete_session),
        )
        .route("/sessions/:id/input", put(handlers::update_input))
        .route("/sessions/:id/variant", put(handlers::update_variant))
        .route("/sessions/:id/events", get(handlers::snapshot_events))
        // Service routes
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}
