//! Error types for the KoRe REST API.
//!
//! Every error renders as a JSON body with a single `detail` field.
//!
//! # Error Mapping
//!
//! | Error | HTTP Status | Detail |
//! |-------|-------------|--------|
//! | NotFound | 404 | `Not found.` |
//! | InvalidPage | 404 | `Invalid page.` |
//! | BadRequest | 400 | The validation message |
//! | InternalError | 500 | `A server error occurred.` |
//!
//! Internal error messages are logged, never returned to the client.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kore_persistence::error::{BackendError, ResourceError, StorageError, ValidationError};
use tracing::{error, warn};

/// The primary error type for REST API operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestError {
    /// No entity or resource type matches the path (HTTP 404).
    NotFound {
        /// The resource type path segment.
        resource_type: String,
        /// The requested id, empty for unknown resource types.
        id: String,
    },

    /// The requested page is out of range or not a number (HTTP 404).
    InvalidPage {
        /// The raw `page` value.
        page: String,
    },

    /// A query parameter was rejected (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::NotFound { .. } | RestError::InvalidPage { .. } => StatusCode::NOT_FOUND,
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the client-facing `detail` text.
    pub fn detail(&self) -> String {
        match self {
            RestError::NotFound { .. } => "Not found.".to_string(),
            RestError::InvalidPage { .. } => "Invalid page.".to_string(),
            RestError::BadRequest { message } => message.clone(),
            RestError::InternalError { .. } => "A server error occurred.".to_string(),
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { resource_type, id } if id.is_empty() => {
                write!(f, "Unknown resource type: {}", resource_type)
            }
            RestError::NotFound { resource_type, id } => {
                write!(f, "Resource not found: {}/{}", resource_type, id)
            }
            RestError::InvalidPage { page } => write!(f, "Invalid page: {}", page),
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let body = serde_json::json!({ "detail": self.detail() });
        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(e) => e.into(),
            StorageError::Resource(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        warn!(error = %err, "Rejected query parameter");
        RestError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { resource_type, id } => {
                RestError::NotFound { resource_type, id }
            }
            ResourceError::UnknownResourceType { resource_type } => RestError::NotFound {
                resource_type,
                id: String::new(),
            },
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        RestError::InternalError {
            message: err.to_string(),
        }
    }
}

/// Result type for REST handlers.
pub type RestResult<T> = Result<T, RestError>;
