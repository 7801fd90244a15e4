//! Active-state resolution for the current route.
//!
//! Both queries are memoized. Active-state keys carry only title, URL and
//! route, so the caches must be cleared whenever the tree itself changes.

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::cache::{CacheStats, SharedCache};
use crate::navigation::hash::structural_hash;
use crate::navigation::item::NavigationItem;

const KEY_SEPARATOR: char = '\u{1f}';
const UNTITLED: &str = "<untitled>";

/// Statistics for both memo tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    pub active_state: CacheStats,
    pub active_parents: CacheStats,
}

// == Active State Resolver ==
/// Memoized active-state queries over a navigation tree.
///
/// Clones share both memo tables.
#[derive(Debug, Clone)]
pub struct ActiveStateResolver {
    active_state: SharedCache<bool>,
    active_parents: SharedCache<Vec<String>>,
}

impl ActiveStateResolver {
    // == Constructor ==
    /// Creates a resolver with one capacity per memo table and a shared TTL.
    pub fn new(
        active_state_capacity: usize,
        active_parents_capacity: usize,
        ttl: Duration,
    ) -> Self {
        Self {
            active_state: SharedCache::new(active_state_capacity, ttl),
            active_parents: SharedCache::new(active_parents_capacity, ttl),
        }
    }

    // == Is Item Active ==
    /// Whether `item` or any descendant corresponds to `current_route`.
    ///
    /// An explicit `is_active: Some(true)` wins; otherwise the URL must equal
    /// the route exactly.
    pub fn is_item_active(&self, item: &NavigationItem, current_route: &str) -> bool {
        let key = active_state_key(item, current_route);
        if let Some(cached) = self.active_state.get(&key) {
            return cached;
        }

        let result = item.is_active == Some(true)
            || matches!(item.url.as_deref(), Some(url) if !url.is_empty() && url == current_route)
            || item
                .children()
                .iter()
                .any(|child| self.is_item_active(child, current_route));

        self.active_state.set(key, result);
        result
    }

    // == Find Active Parents ==
    /// Titles of every container on a path to an active item, in first-seen
    /// depth-first order, without duplicates.
    pub fn find_active_parents(&self, items: &[NavigationItem], current_route: &str) -> Vec<String> {
        let key = format!("{current_route}{KEY_SEPARATOR}{}", structural_hash(items));
        if let Some(cached) = self.active_parents.get(&key) {
            return cached;
        }

        let mut collected = Vec::new();
        let mut path = Vec::new();
        self.collect_active_parents(items, current_route, &mut path, &mut collected);

        let mut seen = HashSet::new();
        let parents: Vec<String> = collected
            .into_iter()
            .filter(|title| seen.insert(title.clone()))
            .collect();

        self.active_parents.set(key, parents.clone());
        parents
    }

    fn collect_active_parents<'a>(
        &self,
        items: &'a [NavigationItem],
        current_route: &str,
        path: &mut Vec<&'a str>,
        collected: &mut Vec<String>,
    ) -> bool {
        let mut has_active = false;

        for item in items {
            if let Some(children) = &item.items {
                path.push(&item.title);
                if self.collect_active_parents(children, current_route, path, collected) {
                    collected.extend(path.iter().map(|title| title.to_string()));
                    has_active = true;
                }
                path.pop();
            }

            if self.is_item_active(item, current_route) {
                has_active = true;
            }
        }

        has_active
    }

    // == Invalidation ==
    /// Empties the ancestor-expansion table only.
    pub fn clear_active_parents_cache(&self) {
        self.active_parents.clear();
        debug!("Active parents cache cleared");
    }

    /// Empties the per-item active-state table only.
    pub fn clear_active_state_cache(&self) {
        self.active_state.clear();
        debug!("Active state cache cleared");
    }

    /// Clears both memo tables.
    pub fn clear(&self) {
        self.clear_active_parents_cache();
        self.clear_active_state_cache();
    }

    /// Drops expired entries from both tables.
    pub fn cleanup_expired(&self) -> usize {
        self.active_state.cleanup_expired() + self.active_parents.cleanup_expired()
    }

    // == Stats ==
    /// Statistics for both memo tables.
    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            active_state: self.active_state.stats(),
            active_parents: self.active_parents.stats(),
        }
    }
}

fn active_state_key(item: &NavigationItem, current_route: &str) -> String {
    let title = if item.title.is_empty() {
        UNTITLED
    } else {
        item.title.as_str()
    };
    let url = item.url.as_deref().unwrap_or("");
    format!("{title}{KEY_SEPARATOR}{url}{KEY_SEPARATOR}{current_route}")
}
