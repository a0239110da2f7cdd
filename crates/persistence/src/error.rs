//! Error types for the persistence layer.
//!
//! Errors are split by who has to act on them: validation errors are the
//! caller's to fix, resource errors signal absence, backend errors propagate
//! to the request layer untouched. Nothing here is retried.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Query parameter validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Resource state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns true if the caller can fix this error by changing its input.
    pub fn is_validation(&self) -> bool {
        matches!(self, StorageError::Validation(_))
    }
}

/// Errors raised while turning query parameters into predicates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value is not one of the accepted codes or canonical values.
    #[error("{parameter} must be one of {}", format_accepted(.accepted))]
    InvalidFilterValue {
        parameter: String,
        accepted: Vec<String>,
    },

    /// The search text is shorter than the required minimum.
    #[error("you must enter at least {min_length} characters in ?{parameter}=")]
    InputTooShort { parameter: String, min_length: usize },

    /// The value should have been a non-negative integer.
    #[error("{parameter} must be a non-negative integer, got '{value}'")]
    InvalidNumber { parameter: String, value: String },
}

fn format_accepted(accepted: &[String]) -> String {
    accepted
        .iter()
        .map(|a| format!("'{}'", a))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors related to resource state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The requested resource was not found.
    #[error("resource not found: {resource_type}/{id}")]
    NotFound { resource_type: String, id: String },

    /// The resource type is not exposed by the API.
    #[error("unknown resource type: {resource_type}")]
    UnknownResourceType { resource_type: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
