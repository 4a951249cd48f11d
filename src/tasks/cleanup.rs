//! Cleanup Task
//!
//! Background task that periodically removes expired cache entries and
//! token buckets of clients that have gone quiet.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::products::ProductService;
use crate::rate_limit::RateLimiter;

/// Spawns a background task that sweeps the product cache and the bucket
/// registry every `cleanup_interval_secs`.
///
/// Returns a JoinHandle that can be used to abort the task during graceful
/// shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_cleanup_task(state.products.clone(), state.rate_limiter.clone(), 30);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(
    products: Arc<ProductService>,
    rate_limiter: Arc<RateLimiter>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));
    let cache = products.cache();

    tokio::spawn(async move {
        info!(
            "Starting cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let expired = cache.write().await.cleanup_expired();
            let idle = rate_limiter.evict_idle();

            if expired > 0 || idle > 0 {
                info!(
                    "Cleanup: removed {} expired cache entries and {} idle buckets",
                    expired, idle
                );
            } else {
                debug!("Cleanup: nothing to remove");
            }
        }
    })
}
