//! HTTP request handlers for the KoRe API.
//!
//! - [`root`] - API root listing the resource URLs
//! - [`list`] - Filtered, paginated lists
//! - [`retrieve`] - One entity by id
//! - [`health`] - Health, liveness and readiness endpoints

pub mod health;
pub mod list;
pub mod retrieve;
pub mod root;

// Re-export handlers for convenience
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use list::list_handler;
pub use retrieve::retrieve_handler;
pub use root::root_handler;
