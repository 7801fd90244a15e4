//! Navigation state manager.
//!
//! Keeps the current route, the titles of active items and the titles of
//! expanded containers, and broadcasts a [`NavigationEvent`] whenever one of
//! them actually changes.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::navigation::active::ActiveStateResolver;
use crate::navigation::hash::structural_hash;
use crate::navigation::item::NavigationItem;

const EVENT_CAPACITY: usize = 64;

/// Stored before any tree has been seen; outside the `u32` hash range.
const NO_TREE: u64 = u64::MAX;

/// Change notifications published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    RouteChanged { new_route: String, old_route: String },
    ActiveItemsChanged(BTreeSet<String>),
    ExpandedItemsChanged(BTreeSet<String>),
}

/// Point-in-time copy of the navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationSnapshot {
    pub current_route: String,
    pub active_items: BTreeSet<String>,
    pub expanded_items: BTreeSet<String>,
    pub last_updated: DateTime<Utc>,
}

impl Default for NavigationSnapshot {
    fn default() -> Self {
        Self {
            current_route: "/".to_string(),
            active_items: BTreeSet::new(),
            expanded_items: BTreeSet::new(),
            last_updated: Utc::now(),
        }
    }
}

// == Navigation State Manager ==
#[derive(Debug)]
pub struct NavigationStateManager {
    resolver: ActiveStateResolver,
    state: Mutex<NavigationSnapshot>,
    events: broadcast::Sender<NavigationEvent>,
    tree_hash: AtomicU64,
}

impl NavigationStateManager {
    pub fn new(resolver: ActiveStateResolver) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            resolver,
            state: Mutex::new(NavigationSnapshot::default()),
            events,
            tree_hash: AtomicU64::new(NO_TREE),
        }
    }

    /// Receiver for every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.events.subscribe()
    }

    // == Update Route ==
    /// Moves to `new_route` and recomputes active and expanded titles for
    /// `items`.
    ///
    /// Expanded titles are replaced by the active ancestors, discarding any
    /// manual toggles. When `items` differs structurally from the tree of the
    /// previous call, both memo tables are cleared first: active-state keys
    /// do not carry the tree, so answers for an edited tree would be stale.
    pub fn update_route(&self, new_route: &str, items: &[NavigationItem]) {
        let hash = u64::from(structural_hash(items));
        if self.tree_hash.swap(hash, Ordering::AcqRel) != hash {
            self.resolver.clear();
            debug!(tree_hash = hash, "Navigation tree changed; memo caches cleared");
        }

        let mut active_items = BTreeSet::new();
        collect_active_titles(&self.resolver, items, new_route, &mut active_items);
        let expanded_items: BTreeSet<String> = self
            .resolver
            .find_active_parents(items, new_route)
            .into_iter()
            .collect();

        let mut pending = Vec::new();
        {
            let mut state = self.lock();
            let old_route = std::mem::replace(&mut state.current_route, new_route.to_string());
            pending.push(NavigationEvent::RouteChanged {
                new_route: new_route.to_string(),
                old_route,
            });
            if state.active_items != active_items {
                state.active_items = active_items.clone();
                pending.push(NavigationEvent::ActiveItemsChanged(active_items));
            }
            if state.expanded_items != expanded_items {
                state.expanded_items = expanded_items.clone();
                pending.push(NavigationEvent::ExpandedItemsChanged(expanded_items));
            }
            state.last_updated = Utc::now();
        }

        debug!(route = new_route, events = pending.len(), "Navigation state updated");
        for event in pending {
            self.publish(event);
        }
    }

    /// Flips the expanded state of a container.
    pub fn toggle_expanded(&self, title: &str) {
        let expanded = {
            let mut state = self.lock();
            if !state.expanded_items.remove(title) {
                state.expanded_items.insert(title.to_string());
            }
            state.last_updated = Utc::now();
            state.expanded_items.clone()
        };
        self.publish(NavigationEvent::ExpandedItemsChanged(expanded));
    }

    /// Whether `title` was active at the last route update.
    pub fn is_item_active(&self, title: &str) -> bool {
        self.lock().active_items.contains(title)
    }

    pub fn is_item_expanded(&self, title: &str) -> bool {
        self.lock().expanded_items.contains(title)
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        self.lock().clone()
    }

    fn publish(&self, event: NavigationEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    fn lock(&self) -> MutexGuard<'_, NavigationSnapshot> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn collect_active_titles(
    resolver: &ActiveStateResolver,
    items: &[NavigationItem],
    route: &str,
    out: &mut BTreeSet<String>,
) {
    for item in items {
        if resolver.is_item_active(item, route) {
            out.insert(item.title.clone());
        }
        collect_active_titles(resolver, item.children(), route, out);
    }
}
