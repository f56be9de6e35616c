//! HTTP surface of the lookup service
//!
//! Exposes the single, batch, and autocomplete airport endpoints plus a
//! root banner route, mirroring the API contract the frontend consumes.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_routes;
pub use state::AppState;
