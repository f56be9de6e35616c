use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Creates the full route tree with CORS and request tracing applied
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/api/airports", get(handlers::search_airports))
        .route("/api/airports/batch", post(handlers::batch_airports))
        .route("/api/airports/{iata}", get(handlers::get_airport))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
