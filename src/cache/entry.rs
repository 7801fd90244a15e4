//! Cache Entry Module
//!
//! A memoized value together with the instant it was stored.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single memoized value and its insertion time.
///
/// Timestamps come from [`tokio::time::Instant`] so that paused test clocks
/// drive expiry the same way they drive timers.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The memoized value
    pub value: V,
    /// Instant the entry was inserted (or overwritten)
    pub created_at: Instant,
    /// Instant after which the entry is treated as absent
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry that expires `ttl` after now.
    pub fn new(value: V, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has outlived its TTL.
    ///
    /// An entry is expired once the current instant is greater than or equal
    /// to its expiration instant, so a zero TTL entry is never served.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    // == Age ==
    /// Time elapsed since the entry was inserted.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.created_at)
    }
}
