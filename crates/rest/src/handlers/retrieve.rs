//! Retrieve handler.
//!
//! `GET /v1/{resource}/{id}/`

use axum::{
    Json,
    extract::{Path, State},
};
use kore_persistence::{ResourceType, SchoolStorage};
use serde_json::Value;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Handler for retrieving one entity.
///
/// The representation is served from the resource's cache, loading and
/// rendering it on a miss.
///
/// # HTTP Request
///
/// `GET [base]/v1/[resource]/[id]/`
///
/// # Response
///
/// - `200 OK` - The entity's representation
/// - `404 Not Found` - Unknown resource type, malformed or unknown id, or a
///   list-only resource
pub async fn retrieve_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource, id)): Path<(String, String)>,
) -> RestResult<Json<Value>>
where
    S: SchoolStorage + 'static,
{
    debug!(resource = %resource, id = %id, "Processing retrieve request");

    let resource_type: ResourceType = resource.parse()?;
    let not_found = || RestError::NotFound {
        resource_type: resource.clone(),
        id: id.clone(),
    };

    if !resource_type.supports_retrieve() {
        return Err(not_found());
    }
    let key: i64 = id.parse().map_err(|_| not_found())?;

    match state.caches().adapter(resource_type).get(key)? {
        Some(representation) => Ok(Json(representation)),
        None => {
            debug!(resource = %resource, id = %id, "Entity not found");
            Err(not_found())
        }
    }
}
