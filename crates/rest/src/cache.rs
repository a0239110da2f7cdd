//! Per-resource representation caches.
//!
//! One cache adapter is built per resource type at startup. All adapters
//! share one [`CacheStore`]; keys are prefixed with the resource name.

use std::fmt;
use std::sync::Arc;

use kore_persistence::cache::CacheStats;
use kore_persistence::{
    CacheStore, EntityCache, EntityDescriptor, ResourceType, SchoolStorage, StorageResult,
    cache_adapter,
};
use serde_json::Value;

use crate::representation::{Renderer, documents};

/// Cache-first representation access for one resource type.
pub trait RepresentationCache: Send + Sync {
    /// Returns the representation of entity `id`, or `None` if it does not
    /// exist.
    fn get(&self, id: i64) -> StorageResult<Option<Value>>;

    /// Returns the representations of `ids` in order, omitting missing
    /// entities.
    fn get_many(&self, ids: &[i64]) -> StorageResult<Vec<Value>>;

    /// Returns the hit and miss counters.
    fn stats(&self) -> CacheStats;
}

impl<E> RepresentationCache for EntityCache<E> {
    fn get(&self, id: i64) -> StorageResult<Option<Value>> {
        EntityCache::get(self, id)
    }

    fn get_many(&self, ids: &[i64]) -> StorageResult<Vec<Value>> {
        EntityCache::get_many(self, ids)
    }

    fn stats(&self) -> CacheStats {
        EntityCache::stats(self)
    }
}

/// The cache adapters of every resource type.
pub struct CacheRegistry {
    school: Arc<dyn RepresentationCache>,
    principal: Arc<dyn RepresentationCache>,
    employership: Arc<dyn RepresentationCache>,
    building: Arc<dyn RepresentationCache>,
    school_building: Arc<dyn RepresentationCache>,
    language: Arc<dyn RepresentationCache>,
    school_type: Arc<dyn RepresentationCache>,
    school_field: Arc<dyn RepresentationCache>,
    store: Arc<dyn CacheStore>,
}

impl CacheRegistry {
    /// Builds the adapters for every resource type over `store`.
    pub fn new<S>(storage: Arc<S>, renderer: Renderer, store: Arc<dyn CacheStore>) -> Self
    where
        S: SchoolStorage + 'static,
    {
        let build = Builder {
            storage,
            renderer,
            store: Arc::clone(&store),
        };
        Self {
            school: build.adapter(ResourceType::School, S::load_school, Renderer::school),
            principal: build.adapter(
                ResourceType::Principal,
                documents::load_principal::<S>,
                Renderer::principal,
            ),
            employership: build.adapter(
                ResourceType::Employership,
                documents::load_employership::<S>,
                Renderer::employership,
            ),
            building: build.adapter(
                ResourceType::Building,
                documents::load_building::<S>,
                Renderer::building,
            ),
            school_building: build.adapter(
                ResourceType::SchoolBuilding,
                documents::load_school_building::<S>,
                Renderer::school_building,
            ),
            language: build.adapter(ResourceType::Language, S::load_language, Renderer::language),
            school_type: build.adapter(
                ResourceType::SchoolType,
                S::load_school_type,
                Renderer::school_type,
            ),
            school_field: build.adapter(
                ResourceType::SchoolField,
                S::load_school_field,
                Renderer::school_field,
            ),
            store,
        }
    }

    /// Returns the adapter of `resource`.
    pub fn adapter(&self, resource: ResourceType) -> &dyn RepresentationCache {
        let adapter = match resource {
            ResourceType::School => &self.school,
            ResourceType::Principal => &self.principal,
            ResourceType::Employership => &self.employership,
            ResourceType::Building => &self.building,
            ResourceType::SchoolBuilding => &self.school_building,
            ResourceType::Language => &self.language,
            ResourceType::SchoolType => &self.school_type,
            ResourceType::SchoolField => &self.school_field,
        };
        adapter.as_ref()
    }

    /// Returns the counters of every adapter, in API root order.
    pub fn stats(&self) -> Vec<(ResourceType, CacheStats)> {
        ResourceType::ALL
            .into_iter()
            .map(|resource| (resource, self.adapter(resource).stats()))
            .collect()
    }

    /// Returns the number of cached representations.
    pub fn cached_entries(&self) -> usize {
        self.store.len()
    }
}

impl fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("cached_entries", &self.store.len())
            .finish_non_exhaustive()
    }
}

struct Builder<S> {
    storage: Arc<S>,
    renderer: Renderer,
    store: Arc<dyn CacheStore>,
}

impl<S: SchoolStorage + 'static> Builder<S> {
    fn adapter<E, L, R>(&self, resource: ResourceType, load: L, render: R) -> Arc<dyn RepresentationCache>
    where
        E: 'static,
        L: Fn(&S, i64) -> StorageResult<Option<E>> + Send + Sync + 'static,
        R: Fn(&Renderer, &E) -> Value + Send + Sync + 'static,
    {
        let storage = Arc::clone(&self.storage);
        let renderer = self.renderer.clone();
        let descriptor = EntityDescriptor::new(
            resource.as_str(),
            move |id| load(storage.as_ref(), id),
            move |entity: &E| render(&renderer, entity),
        );
        Arc::new(cache_adapter(descriptor, Arc::clone(&self.store)))
    }
}
