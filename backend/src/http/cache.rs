//! Analysis result cache.
//!
//! Entries are keyed on the snapshot fingerprint plus a request selector, so
//! a reloaded or edited snapshot can never be answered from a stale entry:
//! its fingerprint differs and the old keys simply stop matching.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache key: content fingerprint of the record set and the request selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub fingerprint: String,
    pub selector: String,
}

impl CacheKey {
    pub fn new(fingerprint: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            selector: selector.into(),
        }
    }
}

/// Bounded in-memory result cache.
///
/// When an insert would exceed `capacity` the whole map is cleared first.
/// A capacity of 0 disables caching.
#[derive(Clone)]
pub struct ResultCache<V> {
    entries: Arc<RwLock<HashMap<CacheKey, V>>>,
    capacity: usize,
}

impl<V: Clone> ResultCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<V> {
        self.entries.read().get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, value: V) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write();
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            tracing::debug!(capacity = self.capacity, "Result cache full, clearing");
            entries.clear();
        }
        entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
