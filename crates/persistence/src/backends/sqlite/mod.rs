//! SQLite backend implementation.
//!
//! Holds the historical register in one SQLite database, either in memory
//! (tests, demos) or in a file. The register is read-only once loaded; data
//! arrives through [`SqliteBackend::execute_batch`] with a SQL dump.
//!
//! # Example
//!
//! ```no_run
//! use kore_persistence::backends::sqlite::SqliteBackend;
//! use kore_persistence::core::SchoolStorage;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//! backend.execute_batch("INSERT INTO language (id, name) VALUES (1, 'suomi');")?;
//!
//! let language = backend.load_language(1)?;
//! assert_eq!(language.map(|l| l.name), Some("suomi".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! # Case-insensitive matching
//!
//! Every pooled connection registers a `casefold(text)` SQL function doing
//! full Unicode lower-casing. SQLite's own `lower()` only folds ASCII, which
//! would make `Ä` and `ä` different.

mod backend;
mod schema;
mod storage;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use schema::SCHEMA_VERSION;
