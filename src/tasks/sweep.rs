//! Expired Entry Sweep
//!
//! Background task that periodically purges expired memo entries. Expiry is
//! already enforced lazily on lookup; the sweep only returns memory early.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::navigation::ActiveStateResolver;

/// Spawns a task that purges expired entries from both memo caches every
/// `interval`.
///
/// The returned handle should be aborted on shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweep_task(engine.resolver().clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task(resolver: ActiveStateResolver, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            "Starting memo cache sweep task"
        );

        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = resolver.cleanup_expired();
            if removed > 0 {
                info!(removed, "Memo sweep removed expired entries");
            } else {
                debug!("Memo sweep found no expired entries");
            }
        }
    })
}
