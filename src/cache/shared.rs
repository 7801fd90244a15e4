//! Shared Cache Module
//!
//! Thread-safe handle over a [`CacheStore`] for use from any tokio worker.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::cache::{CacheStats, CacheStore};

// == Shared Cache ==
/// Cloneable handle to a mutex-guarded [`CacheStore`].
///
/// Each operation takes the lock for its own duration only; there are no
/// cross-operation transactions. A poisoned lock is recovered rather than
/// propagated since cached values are advisory.
#[derive(Debug)]
pub struct SharedCache<V> {
    inner: Arc<Mutex<CacheStore<V>>>,
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> SharedCache<V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `max_entries` values for `ttl`.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheStore::new(max_entries, ttl))),
        }
    }

    // == Get ==
    /// Returns a clone of the live value for `key`, counting a hit or miss.
    pub fn get(&self, key: &str) -> Option<V> {
        self.lock().get(key)
    }

    // == Set ==
    /// Stores `value`, evicting the least recently used key when full.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.lock().set(key, value);
    }

    // == Clear ==
    /// Drops every entry for all clones of this handle.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Removes expired entries, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        self.lock().cleanup_expired()
    }

    // == Stats ==
    /// Snapshot of the underlying store's statistics.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, CacheStore<V>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
