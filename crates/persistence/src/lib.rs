//! KoRe Persistence Layer
//!
//! This crate holds everything between an HTTP request's query string and the
//! historical school register stored in SQLite:
//!
//! - [`types`] - Resource types, validity intervals and pagination
//! - [`models`] - Entity aggregates loaded from storage
//! - [`filter`] - Query filter primitives and the per-resource filter sets
//! - [`cache`] - Entity cache adapters over a pluggable cache store
//! - [`core`] - The storage trait the HTTP layer is written against
//! - [`backends`] - Backend implementations (SQLite)
//! - [`error`] - Error types for all operations
//!
//! # Filtering
//!
//! Filters compile to parameterised SQL fragments over relational paths.
//! Distinct filters are ANDed; a filter spanning several columns ORs them.
//!
//! ```
//! use std::collections::HashMap;
//! use kore_persistence::filter::apply_filters;
//! use kore_persistence::types::ResourceType;
//!
//! let mut params = HashMap::new();
//! params.insert("from_year".to_string(), "1950".to_string());
//! params.insert("gender".to_string(), "f".to_string());
//!
//! let predicate = apply_filters(ResourceType::School, &params).unwrap();
//! assert_eq!(predicate.params.len(), 2);
//!
//! params.insert("gender".to_string(), "x".to_string());
//! assert!(apply_filters(ResourceType::School, &params).is_err());
//! ```
//!
//! # Caching
//!
//! Entity representations are cached per resource type. Entries are never
//! invalidated; the dataset is historical and a restart refreshes the cache.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod cache;
pub mod core;
pub mod error;
pub mod filter;
pub mod models;
pub mod types;

// Re-export commonly used types at crate root
pub use cache::{CacheStore, EntityCache, EntityDescriptor, MemoryCacheStore, cache_adapter};
pub use core::SchoolStorage;
pub use error::{StorageError, StorageResult};
pub use filter::{SqlFragment, SqlParam, apply_filters};
pub use types::{Page, Pagination, ResourceType, ValidityInterval, YearWindow};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
