//! Core types for the persistence layer.
//!
//! - [`ResourceType`] - The resources exposed by the API
//! - [`ValidityInterval`], [`YearWindow`] - Begin/end year ranges and query windows
//! - [`Pagination`], [`Page`] - Page requests and results
//!
//! # Examples
//!
//! ```
//! use kore_persistence::types::{ValidityInterval, YearWindow};
//!
//! // A school name still in use
//! let interval = ValidityInterval::new(Some(1921), None);
//!
//! assert!(interval.overlaps(&YearWindow::new(Some(1950), Some(1960))));
//! assert!(!interval.overlaps(&YearWindow::new(None, Some(1900))));
//! ```

mod interval;
mod pagination;
mod resource;

pub use interval::{ValidityInterval, YearWindow};
pub use pagination::{Page, Pagination};
pub use resource::ResourceType;
