//! Per-entity cache adapters.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tracing::debug;

use super::store::CacheStore;
use crate::error::StorageResult;

/// Loads an entity by id. `Ok(None)` means the entity does not exist.
pub type Loader<E> = Arc<dyn Fn(i64) -> StorageResult<Option<E>> + Send + Sync>;

/// Turns an entity into its cached representation.
pub type Serializer<E> = Arc<dyn Fn(&E) -> Value + Send + Sync>;

/// Lists the cache keys to drop when an entity changes.
pub type Invalidator<E> = Arc<dyn Fn(&E) -> Vec<String> + Send + Sync>;

/// How one entity type is loaded, serialized and invalidated.
pub struct EntityDescriptor<E> {
    name: &'static str,
    loader: Loader<E>,
    serializer: Serializer<E>,
    invalidator: Invalidator<E>,
}

impl<E: 'static> EntityDescriptor<E> {
    /// Creates a descriptor whose invalidator returns no keys.
    pub fn new(
        name: &'static str,
        loader: impl Fn(i64) -> StorageResult<Option<E>> + Send + Sync + 'static,
        serializer: impl Fn(&E) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            loader: Arc::new(loader),
            serializer: Arc::new(serializer),
            invalidator: Arc::new(|_: &E| Vec::new()),
        }
    }

    /// Replaces the invalidator.
    pub fn with_invalidator(
        mut self,
        invalidator: impl Fn(&E) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.invalidator = Arc::new(invalidator);
        self
    }

    /// The entity name used in cache keys.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<E> Clone for EntityDescriptor<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            loader: Arc::clone(&self.loader),
            serializer: Arc::clone(&self.serializer),
            invalidator: Arc::clone(&self.invalidator),
        }
    }
}

impl<E> fmt::Debug for EntityDescriptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Hit and miss counters of one cache adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Cache-first access to one entity type's representations.
pub struct EntityCache<E> {
    descriptor: EntityDescriptor<E>,
    store: Arc<dyn CacheStore>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Builds the cache adapter for one entity type.
pub fn cache_adapter<E>(descriptor: EntityDescriptor<E>, store: Arc<dyn CacheStore>) -> EntityCache<E> {
    EntityCache {
        descriptor,
        store,
        hits: AtomicU64::new(0),
        misses: AtomicU64::new(0),
    }
}

impl<E> EntityCache<E> {
    /// The entity name.
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    /// The store key for `id`.
    pub fn key(&self, id: i64) -> String {
        format!("{}:{}", self.descriptor.name, id)
    }

    /// Returns the representation of entity `id`.
    ///
    /// On a miss the entity is loaded, serialized and stored. Returns
    /// `Ok(None)` if the entity does not exist.
    pub fn get(&self, id: i64) -> StorageResult<Option<Value>> {
        let key = self.key(id);
        if let Some(value) = self.store.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(entity = self.descriptor.name, id, "Cache hit");
            return Ok(Some(value));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(entity = self.descriptor.name, id, "Cache miss");
        self.load(&key, id)
    }

    /// Returns the representations of `ids` in input order.
    ///
    /// Reads the store once and loads only the misses. Entities that do not
    /// exist are omitted.
    pub fn get_many(&self, ids: &[i64]) -> StorageResult<Vec<Value>> {
        let keys: Vec<String> = ids.iter().map(|id| self.key(*id)).collect();
        let cached = self.store.get_many(&keys);

        let mut results = Vec::with_capacity(ids.len());
        let mut misses = 0u64;
        for ((id, key), hit) in ids.iter().zip(&keys).zip(cached) {
            let value = match hit {
                Some(value) => Some(value),
                None => {
                    misses += 1;
                    self.load(key, *id)?
                }
            };
            results.extend(value);
        }

        let hits = ids.len() as u64 - misses;
        self.hits.fetch_add(hits, Ordering::Relaxed);
        self.misses.fetch_add(misses, Ordering::Relaxed);
        debug!(
            entity = self.descriptor.name,
            requested = ids.len(),
            hits,
            misses,
            "Cache batch read"
        );
        Ok(results)
    }

    /// Keys to drop when `entity` changes. Always empty for the shipped
    /// descriptors.
    pub fn invalidate(&self, entity: &E) -> Vec<String> {
        (self.descriptor.invalidator)(entity)
    }

    /// Current hit and miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn load(&self, key: &str, id: i64) -> StorageResult<Option<Value>> {
        let Some(entity) = (self.descriptor.loader)(id)? else {
            return Ok(None);
        };
        let value = (self.descriptor.serializer)(&entity);
        self.store.put(key, value.clone());
        Ok(Some(value))
    }
}

impl<E> fmt::Debug for EntityCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCache")
            .field("descriptor", &self.descriptor)
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::error::{BackendError, StorageError};
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug)]
    struct Language {
        id: i64,
        name: &'static str,
    }

    fn languages(loads: Arc<AtomicUsize>) -> EntityDescriptor<Language> {
        EntityDescriptor::new(
            "language",
            move |id| {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok(match id {
                    1 => Some(Language { id: 1, name: "suomi" }),
                    2 => Some(Language { id: 2, name: "ruotsi" }),
                    _ => None,
                })
            },
            |language: &Language| json!({"id": language.id, "name": language.name}),
        )
    }

    #[test]
    fn test_miss_loads_then_hit_skips_loader() {
        let loads = Arc::new(AtomicUsize::new(0));
        let cache = cache_adapter(languages(loads.clone()), Arc::new(MemoryCacheStore::new()));

        let first = cache.get(1).unwrap();
        let second = cache.get(1).unwrap();
        assert_eq!(first, Some(json!({"id": 1, "name": "suomi"})));
        assert_eq!(first, second);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_missing_entity_is_none() {
        let cache = cache_adapter(
            languages(Arc::new(AtomicUsize::new(0))),
            Arc::new(MemoryCacheStore::new()),
        );
        assert_eq!(cache.get(99).unwrap(), None);
    }

    #[test]
    fn test_get_many_orders_and_omits_missing() {
        let loads = Arc::new(AtomicUsize::new(0));
        let store = Arc::new(MemoryCacheStore::new());
        let cache = cache_adapter(languages(loads.clone()), store.clone());
        cache.get(2).unwrap();

        let values = cache.get_many(&[2, 99, 1]).unwrap();
        assert_eq!(
            values,
            vec![
                json!({"id": 2, "name": "ruotsi"}),
                json!({"id": 1, "name": "suomi"}),
            ]
        );
        // One load for the earlier get, one each for 99 and 1.
        assert_eq!(loads.load(Ordering::SeqCst), 3);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_invalidate_is_always_empty() {
        let cache = cache_adapter(
            languages(Arc::new(AtomicUsize::new(0))),
            Arc::new(MemoryCacheStore::new()),
        );
        assert!(cache.invalidate(&Language { id: 1, name: "suomi" }).is_empty());
    }

    #[test]
    fn test_keys_are_namespaced_by_entity() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        let cache = cache_adapter(languages(Arc::new(AtomicUsize::new(0))), store.clone());
        cache.get(1).unwrap();
        assert!(store.get("language:1").is_some());
        assert_eq!(cache.key(7), "language:7");
    }

    #[test]
    fn test_loader_errors_propagate_without_caching() {
        let store = Arc::new(MemoryCacheStore::new());
        let descriptor = EntityDescriptor::new(
            "school",
            |_| -> StorageResult<Option<i64>> {
                Err(StorageError::Backend(BackendError::QueryError {
                    message: "no such table: school".to_string(),
                }))
            },
            |id: &i64| json!(id),
        );
        let cache = cache_adapter(descriptor, store.clone());
        assert!(cache.get(1).is_err());
        assert!(store.is_empty());
    }
}
