//! Entity caching.
//!
//! Every resource type gets one [`EntityCache`] built at startup from an
//! [`EntityDescriptor`]: the entity name, how to load an entity by id, and
//! how to serialize it. Serialized representations live in a shared
//! [`CacheStore`] under `"<entity>:<id>"` keys.
//!
//! The dataset is historical and read-only, so nothing is ever
//! invalidated. Entries live until the process restarts.

mod adapter;
mod store;

pub use adapter::{CacheStats, EntityCache, EntityDescriptor, Invalidator, Loader, Serializer, cache_adapter};
pub use store::{CacheStore, MemoryCacheStore};
