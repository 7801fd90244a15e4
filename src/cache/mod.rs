//! Cache Module
//!
//! Memoization substrate for the navigation engine: fixed-capacity,
//! time-expiring key/value stores with LRU eviction.

mod entry;
mod lru;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default capacity of a memo cache
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default time-to-live of a memo entry in milliseconds (5 minutes)
pub const DEFAULT_TTL_MS: u64 = 5 * 60 * 1000;
