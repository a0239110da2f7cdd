//! Response bodies for the KoRe API.
//!
//! - [`page`] - List bodies with next and previous links

pub mod page;

pub use page::{ListPage, PageLinks};
