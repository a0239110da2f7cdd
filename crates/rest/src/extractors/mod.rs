//! Custom Axum extractors for the KoRe API.
//!
//! - [`PageRequest`] - Extracts `page` and `page_size` for list requests

pub mod pagination;

pub use pagination::{PageNumber, PageRequest, page_count};
