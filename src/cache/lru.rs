//! LRU Tracker Module
//!
//! Recency order for memo keys, used to pick eviction victims.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks key recency for LRU eviction.
///
/// Front = most recently used, back = least recently used. Memo caches are
/// small (around a hundred keys), so a linear scan on touch is cheaper than
/// maintaining a linked hash map.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if unknown.
    pub fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if pos == 0 {
                return;
            }
            if let Some(existing) = self.order.remove(pos) {
                self.order.push_front(existing);
            }
        } else {
            self.order.push_front(key.to_string());
        }
    }

    /// Forgets a key.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    /// Least recently used key, without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.order.back().map(String::as_str)
    }

    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_new() {
        let lru = LruTracker::new();
        assert!(lru.is_empty());
        assert_eq!(lru.peek_oldest(), None);
    }

    #[test]
    fn test_lru_insertion_order() {
        let mut lru = LruTracker::new();
        lru.touch("Dashboard");
        lru.touch("Admin");
        lru.touch("Users");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some("Dashboard"));
    }

    #[test]
    fn test_lru_touch_refreshes_recency() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");
        lru.touch("c");
        lru.touch("a");

        assert_eq!(lru.evict_oldest(), Some("b".to_string()));
        assert_eq!(lru.evict_oldest(), Some("c".to_string()));
        assert_eq!(lru.evict_oldest(), Some("a".to_string()));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_lru_touch_same_key_is_single_entry() {
        let mut lru = LruTracker::new();
        lru.touch("k");
        lru.touch("k");
        lru.touch("k");
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_lru_remove_and_clear() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");

        lru.remove("a");
        lru.remove("missing");
        assert!(!lru.contains("a"));
        assert!(lru.contains("b"));

        lru.clear();
        assert!(lru.is_empty());
    }
}
