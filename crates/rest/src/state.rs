//! Application state for the KoRe API.
//!
//! The state shared by every request handler: the storage backend, the
//! server configuration, the renderer and the representation caches.

use std::sync::Arc;

use kore_persistence::{MemoryCacheStore, SchoolStorage};

use crate::cache::CacheRegistry;
use crate::config::ServerConfig;
use crate::representation::{NamePolicy, Renderer};

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`SchoolStorage`])
///
/// # Example
///
/// ```rust,ignore
/// use kore_rest::{AppState, ServerConfig};
/// use kore_persistence::backends::sqlite::SqliteBackend;
/// use std::sync::Arc;
///
/// let backend = SqliteBackend::in_memory()?;
/// let state = AppState::new(Arc::new(backend), ServerConfig::default());
/// ```
pub struct AppState<S> {
    /// The storage backend.
    storage: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,

    /// Representation builder.
    renderer: Arc<Renderer>,

    /// Per-resource representation caches.
    caches: Arc<CacheRegistry>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
            renderer: Arc::clone(&self.renderer),
            caches: Arc::clone(&self.caches),
        }
    }
}

impl<S: SchoolStorage + 'static> AppState<S> {
    /// Creates the state with an empty in-process cache.
    ///
    /// # Arguments
    ///
    /// * `storage` - The storage backend (wrapped in Arc)
    /// * `config` - Server configuration
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        let renderer = Renderer::new(
            config.base_url(),
            NamePolicy::new(config.name_cutoff_year),
        );
        let caches = CacheRegistry::new(
            Arc::clone(&storage),
            renderer.clone(),
            Arc::new(MemoryCacheStore::new()),
        );
        Self {
            storage,
            config: Arc::new(config),
            renderer: Arc::new(renderer),
            caches: Arc::new(caches),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the representation builder.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Returns the representation caches.
    pub fn caches(&self) -> &CacheRegistry {
        &self.caches
    }

    /// Returns the default page size for lists.
    pub fn default_page_size(&self) -> u32 {
        self.config.default_page_size
    }

    /// Returns the maximum page size for lists.
    pub fn max_page_size(&self) -> u32 {
        self.config.max_page_size
    }
}
