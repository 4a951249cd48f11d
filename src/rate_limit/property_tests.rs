//! Property-Based Tests for Rate Limiting

use proptest::prelude::*;
use std::time::{Duration, Instant};

use crate::rate_limit::{RateLimiter, TokenBucket};

fn capacity_strategy() -> impl Strategy<Value = u64> {
    1u64..50
}

fn interval_strategy() -> impl Strategy<Value = Duration> {
    (1u64..120).prop_map(Duration::from_secs)
}

/// Gaps between consecutive requests, in milliseconds
fn gaps_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..5_000, 1..200)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // With no elapsed time exactly `capacity` requests are admitted.
    #[test]
    fn prop_token_conservation(capacity in capacity_strategy(), extra in 1u64..20) {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(capacity, Duration::from_secs(60), now);

        let admitted = (0..capacity + extra)
            .filter(|_| bucket.try_consume(now).allowed)
            .count() as u64;

        prop_assert_eq!(admitted, capacity);
    }

    // Token count stays within [0, capacity] for any request pattern.
    #[test]
    fn prop_tokens_bounded(
        capacity in capacity_strategy(),
        interval in interval_strategy(),
        gaps in gaps_strategy()
    ) {
        let start = Instant::now();
        let mut now = start;
        let mut bucket = TokenBucket::new(capacity, interval, start);

        for gap in gaps {
            now += Duration::from_millis(gap);
            let result = bucket.try_consume(now);
            prop_assert!(result.remaining_tokens <= capacity);
            prop_assert_eq!(result.remaining_tokens, bucket.available_tokens());
            if result.remaining_tokens > 0 {
                prop_assert_eq!(result.nanos_to_next_token, 0);
            }
        }
    }

    // Admissions over a window never exceed the burst plus what the refill
    // rate could have produced in that window. The window opens at the first
    // request, after the bucket has sat full for `idle_ms`.
    #[test]
    fn prop_rate_never_exceeded(
        capacity in capacity_strategy(),
        interval in interval_strategy(),
        idle_ms in 0u64..120_000,
        gaps in gaps_strategy()
    ) {
        let created = Instant::now();
        let start = created + Duration::from_millis(idle_ms);
        let mut now = start;
        let mut bucket = TokenBucket::new(capacity, interval, created);
        let mut admitted: u128 = 0;

        for gap in gaps {
            now += Duration::from_millis(gap);
            if bucket.try_consume(now).allowed {
                admitted += 1;
            }
        }

        let elapsed = (now - start).as_nanos();
        let refilled = elapsed * u128::from(capacity) / interval.as_nanos();
        prop_assert!(admitted <= u128::from(capacity) + refilled);
    }

    // A bucket left full is indistinguishable from one created later, so
    // evicting idle buckets never changes an admission decision.
    #[test]
    fn prop_full_bucket_matches_fresh_bucket(
        capacity in capacity_strategy(),
        interval in interval_strategy(),
        idle_ms in 0u64..120_000,
        gaps in gaps_strategy()
    ) {
        let created = Instant::now();
        let mut now = created + Duration::from_millis(idle_ms);
        let mut kept = TokenBucket::new(capacity, interval, created);
        let mut fresh = TokenBucket::new(capacity, interval, now);

        for gap in gaps {
            now += Duration::from_millis(gap);
            prop_assert_eq!(kept.try_consume(now), fresh.try_consume(now));
        }
    }

    // After a full idle interval the bucket is full, never more.
    #[test]
    fn prop_refill_restores_capacity(
        capacity in capacity_strategy(),
        interval in interval_strategy(),
        used in 0u64..50,
        intervals in 1u32..5
    ) {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(capacity, interval, now);
        for _ in 0..used.min(capacity) {
            bucket.try_consume(now);
        }

        bucket.refill(now + interval * intervals);
        prop_assert_eq!(bucket.available_tokens(), capacity);
    }

    // Draining one client leaves every other client at full capacity.
    #[test]
    fn prop_identity_isolation(
        capacity in capacity_strategy(),
        drained in "[a-z]{1,8}",
        other in "[A-Z]{1,8}"
    ) {
        let limiter = RateLimiter::new(capacity, Duration::from_secs(60));
        let now = Instant::now();

        for _ in 0..=capacity {
            limiter.admit_at(&drained, now);
        }

        let result = limiter.admit_at(&other, now);
        prop_assert!(result.allowed);
        prop_assert_eq!(result.remaining_tokens, capacity - 1);
    }
}
