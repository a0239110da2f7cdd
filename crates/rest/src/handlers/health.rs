//! Health check endpoint handlers.
//!
//! Provides health, liveness and readiness endpoints for monitoring and load
//! balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kore_persistence::SchoolStorage;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Reports the backend and the representation cache counters.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Server is healthy
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: SchoolStorage + 'static,
{
    debug!("Processing health check request");

    let caches: Map<String, Value> = state
        .caches()
        .stats()
        .into_iter()
        .map(|(resource, stats)| {
            (
                resource.to_string(),
                json!({
                    "hits": stats.hits,
                    "misses": stats.misses,
                    "hit_rate": stats.hit_rate(),
                }),
            )
        })
        .collect();

    let health_response = json!({
        "status": "healthy",
        "backend": state.storage().backend_name(),
        "version": crate::VERSION,
        "cached_entries": state.caches().cached_entries(),
        "caches": caches,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (StatusCode::OK, Json(health_response)).into_response()
}

/// Handler for the liveness probe.
///
/// # HTTP Request
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness probe.
///
/// Pings the storage backend.
///
/// # HTTP Request
///
/// `GET [base]/_readiness`
///
/// # Response
///
/// - `200 OK` - Storage is reachable
/// - `503 Service Unavailable` - Storage is not reachable
pub async fn readiness_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: SchoolStorage + 'static,
{
    debug!("Processing readiness check request");

    let backend_name = state.storage().backend_name();
    match state.storage().ping() {
        Ok(()) => {
            let response = json!({
                "status": "ready",
                "backend": backend_name,
                "checks": {
                    "storage": "ok"
                }
            });
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Storage is not reachable");
            let response = json!({
                "status": "unavailable",
                "backend": backend_name,
                "checks": {
                    "storage": "error"
                }
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
        }
    }
}
