use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

/// Memo table mapping each key to a value computed at most once.
///
/// Every key owns its own once-cell, so concurrent lookups of different keys
/// never wait on each other while a lookup of the same key blocks until the
/// first computation finishes. Entries are never evicted.
pub struct Memo<K, V> {
    cells: DashMap<K, Arc<OnceLock<V>>>,
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            cells: DashMap::new(),
        }
    }

    /// Returns the cached value for `key`, computing it with `init` if this is
    /// the first request.
    pub fn get_or_compute(&self, key: K, init: impl FnOnce() -> V) -> V {
        // The shard lock is released at the end of this statement; only the
        // per-key cell is held while `init` runs.
        let cell = Arc::clone(&self.cells.entry(key).or_default());
        cell.get_or_init(init).clone()
    }

    /// Returns the cached value for `key` without computing it.
    pub fn get(&self, key: &K) -> Option<V> {
        self.cells.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Number of keys with a completed value.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.value().get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for Memo<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
