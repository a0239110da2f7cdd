//! Server configuration for the KoRe API.
//!
//! Every option can be given on the command line or through a `KORE_*`
//! environment variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `KORE_SERVER_PORT` | 8080 | Server port |
//! | `KORE_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `KORE_LOG_LEVEL` | info | Log level |
//! | `KORE_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `KORE_ENABLE_CORS` | true | Enable CORS |
//! | `KORE_CORS_ORIGINS` | * | Allowed origins |
//! | `KORE_CORS_METHODS` | GET,HEAD,OPTIONS | Allowed methods |
//! | `KORE_CORS_HEADERS` | Accept,Content-Type | Allowed headers |
//! | `KORE_BASE_URL` | http://localhost:8080 | Base URL used in hyperlinks |
//! | `KORE_DATABASE_PATH` | kore.db | SQLite database file, or `:memory:` |
//! | `KORE_LOAD_SQL` | | SQL dump to load at startup |
//! | `KORE_DEFAULT_PAGE_SIZE` | 20 | Default page size |
//! | `KORE_MAX_PAGE_SIZE` | 1000 | Largest page size a client may ask for |
//! | `KORE_NAME_CUTOFF_YEAR` | 1950 | Principal names are hidden for employerships starting later |
//!
//! # Example
//!
//! ```rust
//! use kore_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.socket_addr(), "0.0.0.0:3000");
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Server configuration for the KoRe API.
///
/// Constructed from command line arguments and the environment with
/// [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "kore")]
#[command(about = "Read-only API over the historical school register")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "KORE_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "KORE_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "KORE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "KORE_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "KORE_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "KORE_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "KORE_CORS_METHODS", default_value = "GET,HEAD,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(long, env = "KORE_CORS_HEADERS", default_value = "Accept,Content-Type")]
    pub cors_headers: String,

    /// Base URL for the server (used in hyperlinks and page links).
    #[arg(long, env = "KORE_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// SQLite database file, or `:memory:`.
    #[arg(long, env = "KORE_DATABASE_PATH", default_value = "kore.db")]
    pub database_path: String,

    /// SQL dump to execute after the schema is created.
    #[arg(long, env = "KORE_LOAD_SQL")]
    pub load_sql: Option<PathBuf>,

    /// Default page size for lists.
    #[arg(long, env = "KORE_DEFAULT_PAGE_SIZE", default_value = "20")]
    pub default_page_size: u32,

    /// Maximum page size for lists.
    #[arg(long, env = "KORE_MAX_PAGE_SIZE", default_value = "1000")]
    pub max_page_size: u32,

    /// Principal names are shown only for employerships that began in or
    /// before this year.
    #[arg(long, env = "KORE_NAME_CUTOFF_YEAR", default_value = "1950")]
    pub name_cutoff_year: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,HEAD,OPTIONS".to_string(),
            cors_headers: "Accept,Content-Type".to_string(),
            base_url: "http://localhost:8080".to_string(),
            database_path: "kore.db".to_string(),
            load_sql: None,
            default_page_size: 20,
            max_page_size: 1000,
            name_cutoff_year: 1950,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// Parses without requiring command line arguments, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self::try_parse_from(["kore"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            errors.push(format!("Base URL '{}' is not a valid URL", self.base_url));
        }

        if self.database_path.trim().is_empty() {
            errors.push("Database path cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses an in-memory database, an ephemeral port and small pages.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            base_url: "http://testserver".to_string(),
            database_path: ":memory:".to_string(),
            default_page_size: 10,
            max_page_size: 100,
            ..Self::default()
        }
    }
}
