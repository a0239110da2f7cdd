//! Pagination extractor.
//!
//! Extracts the `page` and `page_size` query parameters of list requests.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use kore_persistence::{Pagination, SchoolStorage};
use serde::Deserialize;

use crate::error::RestError;
use crate::state::AppState;

/// The requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    /// A 1-based page number.
    Number(u32),
    /// The last page, whatever its number.
    Last,
}

/// Axum extractor for list pagination.
///
/// `page` is a 1-based number or `last`; anything else is rejected with
/// 404 "Invalid page.". `page_size` is capped at the configured maximum;
/// a missing or malformed size falls back to the default.
///
/// # Example
///
/// ```rust,ignore
/// use kore_rest::extractors::PageRequest;
///
/// async fn list_handler(page: PageRequest) {
///     let page_size = page.page_size();
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: PageNumber,
    page_size: u32,
}

/// Query parameters for pagination.
#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
    page_size: Option<String>,
}

impl PageRequest {
    /// Creates a page request.
    pub fn new(number: PageNumber, page_size: u32) -> Self {
        Self { number, page_size }
    }

    /// Parses raw `page` and `page_size` values.
    pub fn parse(
        page: Option<&str>,
        page_size: Option<&str>,
        default_page_size: u32,
        max_page_size: u32,
    ) -> Result<Self, RestError> {
        let number = match page.map(str::trim).filter(|p| !p.is_empty()) {
            None => PageNumber::Number(1),
            Some("last") => PageNumber::Last,
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n >= 1 => PageNumber::Number(n),
                _ => {
                    return Err(RestError::InvalidPage {
                        page: raw.to_string(),
                    });
                }
            },
        };

        let page_size = page_size
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(default_page_size)
            .min(max_page_size);

        Ok(Self { number, page_size })
    }

    /// Returns the requested page.
    pub fn number(&self) -> PageNumber {
        self.number
    }

    /// Returns the page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Resolves the request against the number of matches.
    ///
    /// Fails with [`RestError::InvalidPage`] past the last page. An empty
    /// result still has one (empty) page.
    pub fn resolve(&self, total: u64) -> Result<Pagination, RestError> {
        let last = page_count(total, self.page_size);
        let page = match self.number {
            PageNumber::Last => last,
            PageNumber::Number(n) if n <= last => n,
            PageNumber::Number(n) => {
                return Err(RestError::InvalidPage {
                    page: n.to_string(),
                });
            }
        };
        Ok(Pagination::new(page, self.page_size))
    }
}

/// Returns the number of pages needed for `total` matches, at least one.
pub fn page_count(total: u64, page_size: u32) -> u32 {
    let pages = total.div_ceil(u64::from(page_size.max(1))).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

impl<S> FromRequestParts<AppState<S>> for PageRequest
where
    S: SchoolStorage + 'static,
{
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::BadRequest {
                message: e.body_text(),
            })?;

        PageRequest::parse(
            query.page.as_deref(),
            query.page_size.as_deref(),
            state.default_page_size(),
            state.max_page_size(),
        )
    }
}
