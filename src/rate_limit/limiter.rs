//! Rate Limiter Module
//!
//! Registry of token buckets keyed by client identity.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, warn};

use super::bucket::{AdmissionResult, TokenBucket};

// == Rate Limiter ==
/// Admission controller holding one [`TokenBucket`] per client identity.
///
/// Bucket creation goes through the map's entry API and the refill/consume
/// step runs while the entry's shard lock is held, so concurrent first
/// requests for one identity share a single bucket and no decrement is lost.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    capacity: u64,
    refill_interval: Duration,
}

impl RateLimiter {
    // == Constructor ==
    /// Creates a limiter granting `capacity` requests per `refill_interval`.
    ///
    /// Zero values are raised to the smallest usable setting.
    pub fn new(capacity: u64, refill_interval: Duration) -> Self {
        Self {
            buckets: DashMap::new(),
            capacity: capacity.max(1),
            refill_interval: refill_interval.max(Duration::from_nanos(1)),
        }
    }

    // == Admit ==
    /// Decides whether a request from `identity` may proceed.
    pub fn admit(&self, identity: &str) -> AdmissionResult {
        self.admit_at(identity, Instant::now())
    }

    /// [`RateLimiter::admit`] against an explicit clock reading.
    pub fn admit_at(&self, identity: &str, now: Instant) -> AdmissionResult {
        let result = match self.buckets.get_mut(identity) {
            Some(mut bucket) => bucket.try_consume(now),
            None => self
                .buckets
                .entry(identity.to_owned())
                .or_insert_with(|| {
                    debug!(identity, "Creating token bucket");
                    TokenBucket::new(self.capacity, self.refill_interval, now)
                })
                .try_consume(now),
        };

        if !result.allowed {
            warn!(
                identity,
                retry_after_secs = result.reset_after_secs(),
                "Rate limit exceeded"
            );
        }
        result
    }

    // == Evict Idle ==
    /// Drops buckets that would be full on their next use.
    ///
    /// Returns the number of buckets removed.
    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    pub fn evict_idle_at(&self, now: Instant) -> usize {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| !bucket.is_idle(now));
        before.saturating_sub(self.buckets.len())
    }

    /// Number of identities currently holding a bucket.
    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn refill_interval(&self) -> Duration {
        self.refill_interval
    }
}
