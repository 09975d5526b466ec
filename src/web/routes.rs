//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post},
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
        // Interaction routes
        .route("/api/state", get(handlers::state))
        .route("/api/search", get(handlers::search))
        .route("/api/movies/:id", get(handlers::select))
        .route("/api/selection", delete(handlers::clear_selection))
        .route("/api/filter", post(handlers::apply_filter))
        .route("/api/year", get(handlers::current_year_panel))
        .route("/api/year/:year", get(handlers::year_panel))
        .route("/api/seed", get(handlers::seed))
        // Service routes
        .route("/health", get(handlers::health))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}
