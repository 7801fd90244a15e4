//! Cache Statistics Module
//!
//! Counters describing how useful a memo cache has been.

use serde::Serialize;

// == Cache Stats ==
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to recompute (absent or expired)
    pub misses: u64,
    /// Entries dropped to make room for a new key
    pub evictions: u64,
    /// Entries dropped because their TTL elapsed
    pub expirations: u64,
    /// Entries currently held
    pub total_entries: usize,
    /// Maximum entries before eviction
    pub capacity: usize,
    /// Lifetime of each entry
    pub ttl_ms: u64,
    /// Age of the least recently used entry, if any
    pub oldest_entry_age_ms: Option<u64>,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_eviction_and_expiration() {
        let mut stats = CacheStats::new();
        stats.record_eviction();
        stats.record_expirations(3);
        stats.record_expirations(0);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.expirations, 3);
    }

    #[test]
    fn test_stats_serialize() {
        let mut stats = CacheStats::new();
        stats.set_total_entries(7);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_entries"], 7);
        assert_eq!(json["hits"], 0);
    }
}
