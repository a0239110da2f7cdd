//! API root handler.

use axum::{Json, extract::State};
use kore_persistence::{ResourceType, SchoolStorage};
use serde_json::{Map, Value};
use tracing::debug;

use crate::state::AppState;

/// Handler for the API root, listing the URL of every resource.
///
/// # HTTP Request
///
/// `GET [base]/v1/`
///
/// # Response
///
/// ```json
/// { "school": "http://localhost:8080/v1/school/", "principal": "…" }
/// ```
pub async fn root_handler<S>(State(state): State<AppState<S>>) -> Json<Value>
where
    S: SchoolStorage + 'static,
{
    debug!("Processing API root request");

    let renderer = state.renderer();
    let resources: Map<String, Value> = ResourceType::ALL
        .into_iter()
        .map(|resource| {
            (
                resource.to_string(),
                Value::String(renderer.collection_url(resource)),
            )
        })
        .collect();
    Json(Value::Object(resources))
}
