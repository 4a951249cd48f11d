//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
/// Bounded key-value storage with LRU eviction and a fixed TTL.
///
/// Every invalidation bumps an epoch. A loader that reads the epoch before
/// going to its backing source can use [`CacheStore::insert_if_current`] so
/// that a result computed before an invalidation is never stored after it.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    lru: LruTracker<K>,
    stats: CacheStats,
    max_entries: usize,
    ttl: Duration,
    epoch: u64,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and TTL.
    ///
    /// A `max_entries` of zero disables caching: inserts are dropped.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            ttl,
            epoch: 0,
        }
    }

    // == Insert ==
    /// Stores a value, overwriting any previous entry and resetting its TTL.
    ///
    /// If the cache is at capacity, the least recently used entry is evicted.
    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Stores a value only if no invalidation happened since `epoch` was read.
    ///
    /// Returns whether the value was stored.
    pub fn insert_if_current(&mut self, key: K, value: V, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.insert(key, value);
        true
    }

    fn insert_at(&mut self, key: K, value: V, now: Instant) {
        if self.max_entries == 0 {
            return;
        }

        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.max_entries {
                let Some(victim) = self.lru.pop_least_recent() else {
                    break;
                };
                self.entries.remove(&victim);
                self.stats.record_eviction();
            }
        }

        self.entries
            .insert(key.clone(), CacheEntry::new(value, self.ttl, now));
        self.lru.mark_used(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if found and not expired. Expired entries are removed
    /// and counted as misses.
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&mut self, key: &K, now: Instant) -> Option<V> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired_at(now) {
            self.entries.remove(key);
            self.lru.forget(key);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_miss();
            return None;
        }

        let value = entry.value.clone();
        self.stats.record_hit();
        self.lru.mark_used(key);
        Some(value)
    }

    // == Invalidate ==
    /// Removes an entry by key and bumps the epoch.
    ///
    /// Returns whether an entry was present.
    pub fn invalidate(&mut self, key: &K) -> bool {
        self.epoch += 1;
        if self.entries.remove(key).is_some() {
            self.lru.forget(key);
            self.stats.record_invalidation();
            self.stats.set_total_entries(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Epoch ==
    /// Returns the current invalidation epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Drops every expired entry and returns how many went.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        let lru = &mut self.lru;
        self.entries.retain(|key, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                lru.forget(key);
            }
            keep
        });

        self.stats.set_total_entries(self.entries.len());
        before - self.entries.len()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
