//! KoRe route configuration.

use axum::{Router, routing::get};
use kore_persistence::SchoolStorage;

use crate::handlers;
use crate::state::AppState;

/// Creates all KoRe API routes.
///
/// Every API route answers with and without a trailing slash.
///
/// # Routes
///
/// ## System-level
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// ## API
/// - `GET /v1/` - API root
/// - `GET /v1/{resource}/` - List
/// - `GET /v1/{resource}/{id}/` - Retrieve
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: SchoolStorage + 'static,
{
    Router::new()
        // System-level routes
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        // API root
        .route("/v1", get(handlers::root_handler::<S>))
        .route("/v1/", get(handlers::root_handler::<S>))
        // Resource routes
        .route("/v1/{resource}", get(handlers::list_handler::<S>))
        .route("/v1/{resource}/", get(handlers::list_handler::<S>))
        .route("/v1/{resource}/{id}", get(handlers::retrieve_handler::<S>))
        .route("/v1/{resource}/{id}/", get(handlers::retrieve_handler::<S>))
        // State
        .with_state(state)
}
