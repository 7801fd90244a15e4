//! Cache Store Module
//!
//! Memo store combining HashMap storage with LRU tracking and TTL expiry.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
/// Fixed-capacity, time-expiring memo store.
///
/// Lookups never fail: an absent or expired key is simply a miss. Expiry is
/// lazy, checked on `get`; [`CacheStore::cleanup_expired`] exists for
/// callers that want to reclaim memory eagerly.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
    ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` values for `ttl` each.
    ///
    /// A capacity of zero yields a store that never retains anything.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            ttl,
        }
    }

    // == Set ==
    /// Stores a value, resetting its TTL if the key already exists.
    ///
    /// When a new key would exceed capacity the least recently used entry is
    /// evicted first.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        if self.max_entries == 0 {
            return;
        }
        let key = key.into();

        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.max_entries {
                match self.lru.evict_oldest() {
                    Some(evicted) => {
                        self.entries.remove(&evicted);
                        self.stats.record_eviction();
                    }
                    None => break,
                }
            }
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(value, self.ttl));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns a clone of the value if present and not expired.
    ///
    /// Hits refresh the key's recency; expired entries are dropped.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Clear ==
    /// Drops every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    // == Stats ==
    /// Snapshot of the counters plus the store's current shape.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats.capacity = self.max_entries();
        stats.ttl_ms = self.ttl().as_millis() as u64;
        stats.oldest_entry_age_ms = self
            .lru
            .peek_oldest()
            .and_then(|key| self.entries.get(key))
            .map(|entry| entry.age().as_millis() as u64);
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
