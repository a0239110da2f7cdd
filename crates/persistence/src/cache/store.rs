//! Cache stores holding serialized representations.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

/// A key-value store for serialized entity representations.
///
/// Implementations must be safe to share between request handlers.
/// Concurrent puts to one key may race; the last write wins.
pub trait CacheStore: Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: Value);

    /// Returns the values for `keys` in one read, in input order.
    fn get_many(&self, keys: &[String]) -> Vec<Option<Value>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Returns true if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-process cache store.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryCacheStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: &str, value: Value) {
        self.entries.write().insert(key.to_string(), value);
    }

    fn get_many(&self, keys: &[String]) -> Vec<Option<Value>> {
        let entries = self.entries.read();
        keys.iter().map(|key| entries.get(key).cloned()).collect()
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}
