//! Navigation engine composition root.
//!
//! Owns both memo caches and the debouncer. Construct one per application
//! or session and share it; nothing here is process-global.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::navigation::{
    filter_nav_items_within, ActiveStateResolver, NavigationItem, NavigationStateManager,
    ResolverStats,
};
use crate::tasks::{DebounceHandle, Debouncer};

// == Navigation Engine ==
#[derive(Debug)]
pub struct NavigationEngine {
    config: EngineConfig,
    resolver: ActiveStateResolver,
    debouncer: Debouncer,
    slow_filters: AtomicU64,
}

impl Default for NavigationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl NavigationEngine {
    pub fn new(config: EngineConfig) -> Self {
        let resolver = ActiveStateResolver::new(
            config.active_cache_size,
            config.parents_cache_size,
            config.cache_ttl(),
        );
        let on_fire = resolver.clone();
        let debouncer = Debouncer::new(Arc::new(move || on_fire.clear()));

        Self {
            config,
            resolver,
            debouncer,
            slow_filters: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn resolver(&self) -> &ActiveStateResolver {
        &self.resolver
    }

    /// A state manager sharing this engine's memo caches.
    pub fn state_manager(&self) -> NavigationStateManager {
        NavigationStateManager::new(self.resolver.clone())
    }

    // == Filtering ==
    /// Returns the authorized, pruned tree to render.
    ///
    /// Only a failing `visible` predicate produces an error.
    pub async fn filter_nav_items(&self, items: &[NavigationItem]) -> Result<Vec<NavigationItem>> {
        let started = Instant::now();
        let filtered = filter_nav_items_within(items, self.config.access_timeout()).await?;

        let elapsed = started.elapsed();
        if elapsed > self.config.slow_filter_threshold() {
            self.slow_filters.fetch_add(1, Ordering::Relaxed);
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                items = items.len(),
                "Navigation filtering was slow"
            );
        } else {
            debug!(
                elapsed_us = elapsed.as_micros() as u64,
                kept = filtered.len(),
                "Navigation filtered"
            );
        }
        Ok(filtered)
    }

    /// Number of filter runs that exceeded the slow-filter threshold.
    pub fn slow_filter_count(&self) -> u64 {
        self.slow_filters.load(Ordering::Relaxed)
    }

    // == Active State ==
    pub fn is_item_active(&self, item: &NavigationItem, current_route: &str) -> bool {
        self.resolver.is_item_active(item, current_route)
    }

    pub fn find_active_parents(&self, items: &[NavigationItem], current_route: &str) -> Vec<String> {
        self.resolver.find_active_parents(items, current_route)
    }

    // == Invalidation ==
    /// Clears both memo tables immediately.
    pub fn clear_active_parents_cache(&self) {
        self.resolver.clear();
    }

    pub fn clear_active_state_cache(&self) {
        self.resolver.clear_active_state_cache();
    }

    /// Schedules a clear of both memo tables `delay` from now, coalescing
    /// with any clear already pending.
    pub fn debounced_clear_cache(&self, delay: Duration) -> DebounceHandle {
        self.debouncer.schedule(delay)
    }

    /// [`Self::debounced_clear_cache`] with the configured delay.
    pub fn debounced_clear(&self) -> DebounceHandle {
        self.debounced_clear_cache(self.config.debounce_delay())
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Cancels any pending debounced clear and empties both caches.
    pub fn dispose(&self) {
        self.debouncer.cancel_pending();
        self.resolver.clear();
    }

    pub fn stats(&self) -> ResolverStats {
        self.resolver.stats()
    }
}
