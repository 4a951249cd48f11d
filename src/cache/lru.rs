//! LRU Tracker Module
//!
//! Recency order over cache keys, used to pick eviction victims.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Keys ordered from least recently used (front) to most recently used (back).
///
/// Operations are linear in the number of keys, which stays bounded by the
/// cache capacity.
#[derive(Debug)]
pub struct LruTracker<K> {
    order: VecDeque<K>,
}

impl<K> Default for LruTracker<K> {
    fn default() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }
}

impl<K: PartialEq + Clone> LruTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a use of `key`, making it the last eviction candidate.
    pub fn mark_used(&mut self, key: &K) {
        self.forget(key);
        self.order.push_back(key.clone());
    }

    pub fn forget(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    /// Removes and returns the least recently used key.
    pub fn pop_least_recent(&mut self) -> Option<K> {
        self.order.pop_front()
    }
}
