//! Token Bucket Module
//!
//! Per-client token bucket with continuous refill.

use std::time::{Duration, Instant};

// == Admission Result ==
/// Outcome of a single admission decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionResult {
    /// Whether a token was consumed for this request
    pub allowed: bool,
    /// Whole tokens left after the decision
    pub remaining_tokens: u64,
    /// Time until the next token, zero while tokens remain
    pub nanos_to_next_token: u64,
    /// Bucket capacity
    pub limit: u64,
}

impl AdmissionResult {
    /// Wait estimate in whole seconds, rounded down.
    pub fn reset_after_secs(&self) -> u64 {
        self.nanos_to_next_token / 1_000_000_000
    }
}

// == Token Bucket ==
/// Refills `capacity` tokens evenly over `refill_interval`.
///
/// Tokens are kept as whole units. While tokens are missing, `last_refill`
/// only advances by the time that was converted into tokens, so a partially
/// accrued token carries over to the next call instead of being lost.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: u64,
    refill_interval: Duration,
    available_tokens: u64,
    last_refill: Instant,
}

impl TokenBucket {
    // == Constructor ==
    /// Creates a full bucket.
    ///
    /// `capacity` and `refill_interval` must be non-zero.
    pub fn new(capacity: u64, refill_interval: Duration, now: Instant) -> Self {
        debug_assert!(capacity > 0, "capacity must be non-zero");
        debug_assert!(!refill_interval.is_zero(), "refill interval must be non-zero");
        Self {
            capacity,
            refill_interval,
            available_tokens: capacity,
            last_refill: now,
        }
    }

    // == Refill ==
    /// Adds the tokens accrued between `last_refill` and `now`, capped at capacity.
    ///
    /// Time spent full accrues nothing: a full bucket only moves its clock
    /// forward.
    pub fn refill(&mut self, now: Instant) {
        if self.available_tokens == self.capacity {
            self.last_refill = self.last_refill.max(now);
            return;
        }

        let elapsed = now.saturating_duration_since(self.last_refill).as_nanos();
        let interval = self.interval_nanos();
        let capacity = u128::from(self.capacity);

        let accrued = elapsed * capacity / interval;
        if accrued == 0 {
            return;
        }

        let missing = u128::from(self.capacity - self.available_tokens);
        if accrued >= missing {
            self.available_tokens = self.capacity;
            self.last_refill = now;
        } else {
            // accrued < capacity here, so the cast is lossless
            self.available_tokens += accrued as u64;
            let consumed = (accrued * interval).div_ceil(capacity);
            self.last_refill += Duration::from_nanos(saturate_u64(consumed));
        }
    }

    // == Try Consume ==
    /// Refills, then takes one token if available.
    pub fn try_consume(&mut self, now: Instant) -> AdmissionResult {
        self.refill(now);

        let allowed = self.available_tokens >= 1;
        if allowed {
            self.available_tokens -= 1;
        }

        AdmissionResult {
            allowed,
            remaining_tokens: self.available_tokens,
            nanos_to_next_token: self.nanos_to_next_token(now),
            limit: self.capacity,
        }
    }

    /// Time until one more whole token accrues, zero if one is available.
    pub fn nanos_to_next_token(&self, now: Instant) -> u64 {
        if self.available_tokens > 0 {
            return 0;
        }
        let per_token = self.interval_nanos().div_ceil(u128::from(self.capacity));
        let accrued = now.saturating_duration_since(self.last_refill).as_nanos();
        saturate_u64(per_token.saturating_sub(accrued))
    }

    /// True once a full interval has passed since the last refill, meaning
    /// the next call would find the bucket full.
    pub fn is_idle(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_refill) >= self.refill_interval
    }

    pub fn available_tokens(&self) -> u64 {
        self.available_tokens
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    fn interval_nanos(&self) -> u128 {
        self.refill_interval.as_nanos().max(1)
    }
}

fn saturate_u64(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
