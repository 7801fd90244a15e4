//! Configuration Module
//!
//! Handles loading engine configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MS};

/// Navigation engine configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Capacity of the active-state memo cache
    pub active_cache_size: usize,
    /// Capacity of the ancestor-expansion memo cache
    pub parents_cache_size: usize,
    /// TTL in milliseconds for both memo caches
    pub cache_ttl_ms: u64,
    /// Default delay for debounced cache clears
    pub debounce_ms: u64,
    /// Deny async access checks that take longer than this; `None` waits forever
    pub access_timeout_ms: Option<u64>,
    /// Filtering slower than this is logged as a warning
    pub slow_filter_ms: u64,
    /// Interval of the expired-entry sweep task in seconds
    pub sweep_interval_secs: u64,
}

impl EngineConfig {
    /// Creates a new EngineConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `NAV_ACTIVE_CACHE_SIZE` - Active-state cache capacity (default: 100)
    /// - `NAV_PARENTS_CACHE_SIZE` - Ancestor cache capacity (default: 100)
    /// - `NAV_CACHE_TTL_MS` - Cache TTL in milliseconds (default: 300000)
    /// - `NAV_DEBOUNCE_MS` - Debounced clear delay (default: 1000)
    /// - `NAV_ACCESS_TIMEOUT_MS` - Access check timeout (default: unset)
    /// - `NAV_SLOW_FILTER_MS` - Slow filtering threshold (default: 100)
    /// - `NAV_SWEEP_INTERVAL_SECS` - Sweep interval (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            active_cache_size: parse_var("NAV_ACTIVE_CACHE_SIZE")
                .unwrap_or(defaults.active_cache_size),
            parents_cache_size: parse_var("NAV_PARENTS_CACHE_SIZE")
                .unwrap_or(defaults.parents_cache_size),
            cache_ttl_ms: parse_var("NAV_CACHE_TTL_MS").unwrap_or(defaults.cache_ttl_ms),
            debounce_ms: parse_var("NAV_DEBOUNCE_MS").unwrap_or(defaults.debounce_ms),
            access_timeout_ms: parse_var("NAV_ACCESS_TIMEOUT_MS"),
            slow_filter_ms: parse_var("NAV_SLOW_FILTER_MS").unwrap_or(defaults.slow_filter_ms),
            sweep_interval_secs: parse_var("NAV_SWEEP_INTERVAL_SECS")
                .unwrap_or(defaults.sweep_interval_secs),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn access_timeout(&self) -> Option<Duration> {
        self.access_timeout_ms.map(Duration::from_millis)
    }

    pub fn slow_filter_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_filter_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            active_cache_size: DEFAULT_MAX_ENTRIES,
            parents_cache_size: DEFAULT_MAX_ENTRIES,
            cache_ttl_ms: DEFAULT_TTL_MS,
            debounce_ms: 1000,
            access_timeout_ms: None,
            slow_filter_ms: 100,
            sweep_interval_secs: 60,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
