//! List handler.
//!
//! `GET /v1/{resource}/?<filters>&page=<n>&page_size=<n>`

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use kore_persistence::filter::QueryParams;
use kore_persistence::{Pagination, ResourceType, SchoolStorage, apply_filters};
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::{PageNumber, PageRequest};
use crate::responses::{ListPage, PageLinks};
use crate::state::AppState;

/// Handler for listing a resource.
///
/// Query parameters are compiled by the resource's filter set into one
/// predicate. The matching ids of the requested page come from storage;
/// their representations come from the cache.
///
/// # HTTP Request
///
/// `GET [base]/v1/[resource]/`
///
/// # Query Parameters
///
/// - `page` - 1-based page number, or `last`
/// - `page_size` - Results per page, capped by configuration
/// - Any filter parameter the resource recognises; others are ignored
///
/// # Response
///
/// - `200 OK` - `{count, next, previous, results}`
/// - `400 Bad Request` - A filter value was rejected
/// - `404 Not Found` - Unknown resource type or invalid page
pub async fn list_handler<S>(
    State(state): State<AppState<S>>,
    Path(resource): Path<String>,
    page: PageRequest,
    Query(query): Query<Vec<(String, String)>>,
) -> RestResult<Json<ListPage>>
where
    S: SchoolStorage + 'static,
{
    debug!(
        resource = %resource,
        params = query.len(),
        "Processing list request"
    );

    let resource_type: ResourceType = resource.parse()?;
    let params: QueryParams = query.iter().cloned().collect::<HashMap<_, _>>();
    let predicate = apply_filters(resource_type, &params)?;

    let storage = state.storage();
    let pagination = match page.number() {
        PageNumber::Number(n) => Pagination::new(n, page.page_size()),
        PageNumber::Last => {
            let probe = storage.query_ids(
                resource_type,
                &predicate,
                Pagination::new(1, page.page_size()),
            )?;
            page.resolve(probe.total)?
        }
    };

    let ids = storage.query_ids(resource_type, &predicate, pagination)?;
    page.resolve(ids.total)?;

    let results = state.caches().adapter(resource_type).get_many(&ids.items)?;
    debug!(
        resource = %resource,
        total = ids.total,
        page = pagination.page,
        returned = results.len(),
        "Returning list page"
    );

    let links = PageLinks::new(&state.renderer().collection_url(resource_type), &query)
        .ok_or_else(|| RestError::InternalError {
            message: format!("base URL '{}' is not absolute", state.renderer().base_url()),
        })?;
    Ok(Json(links.list(&ids, results)))
}
