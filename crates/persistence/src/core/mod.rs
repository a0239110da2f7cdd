//! Core storage traits.
//!
//! The HTTP layer is written against [`SchoolStorage`]; backends implement
//! it. Only SQLite ships today.
//!
//! # Example: Implementing a Storage Backend
//!
//! ```ignore
//! use kore_persistence::core::SchoolStorage;
//! use kore_persistence::error::StorageResult;
//! use kore_persistence::models::Language;
//!
//! struct MyBackend {
//!     // ... backend-specific fields
//! }
//!
//! impl SchoolStorage for MyBackend {
//!     fn backend_name(&self) -> &'static str {
//!         "my-backend"
//!     }
//!
//!     fn load_language(&self, id: i64) -> StorageResult<Option<Language>> {
//!         // Implementation...
//!         todo!()
//!     }
//!
//!     // ... implement other required methods
//! }
//! ```

pub mod storage;

pub use storage::SchoolStorage;
