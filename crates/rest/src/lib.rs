//! # kore-rest - HTTP API for the historical school register
//!
//! This crate serves the school register as a read-only JSON API: every
//! resource can be listed with filters and pagination, and retrieved by id.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use kore_rest::{create_app, ServerConfig};
//! use kore_persistence::backends::sqlite::SqliteBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SqliteBackend::open("kore.db")?;
//!     backend.init_schema()?;
//!
//!     let app = create_app(backend);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | API root | GET | `/v1/` |
//! | list | GET | `/v1/[resource]/?params` |
//! | retrieve | GET | `/v1/[resource]/[id]/` |
//! | health | GET | `/health`, `/_liveness`, `/_readiness` |
//!
//! Resources: `school`, `principal`, `employership` (list only), `building`,
//! `school_building`, `language`, `school_type`, `school_field`.
//!
//! ## Error Handling
//!
//! Errors are JSON objects with a `detail` field:
//!
//! | HTTP Status | Description |
//! |-------------|-------------|
//! | 400 | A filter value was rejected |
//! | 404 | Unknown resource or id, or invalid page |
//! | 500 | Storage failure |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and their JSON bodies
//! - [`config`] - Server configuration
//! - [`state`] - Application state (storage, configuration, caches)
//! - [`cache`] - Per-resource representation caches
//! - [`representation`] - JSON representations of register entities
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] - Axum extractors for pagination
//! - [`responses`] - List bodies and page links
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod representation;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use kore_persistence::SchoolStorage;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
///
/// # Arguments
///
/// * `storage` - The storage backend to use
pub fn create_app<S>(storage: S) -> Router
where
    S: SchoolStorage + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Sets up the routes, the representation caches and the middleware
/// stack (tracing, timeout and optionally CORS).
///
/// # Arguments
///
/// * `storage` - The storage backend to use
/// * `config` - Server configuration
///
/// # Example
///
/// ```rust,ignore
/// use kore_rest::{create_app_with_config, ServerConfig};
/// use kore_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// let config = ServerConfig {
///     port: 3000,
///     base_url: "https://kore.example.fi".to_string(),
///     ..Default::default()
/// };
/// let app = create_app_with_config(backend, config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: SchoolStorage + 'static,
{
    info!(
        backend = storage.backend_name(),
        base_url = %config.base_url(),
        name_cutoff_year = config.name_cutoff_year,
        "Creating REST API server"
    );

    let state = AppState::new(Arc::new(storage), config.clone());
    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG`, when
/// set, overrides `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "kore={level},kore_rest={level},kore_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
