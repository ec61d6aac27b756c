//! Rate limiter bucket cleanup task
//!
//! Periodically forgets client IPs that have been idle, so the limiter's map
//! does not grow with every address ever seen.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::middleware::RateLimiterState;

/// Default cleanup interval: every five minutes
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;

/// Buckets idle this long are full again and can be dropped
const IDLE_AFTER: Duration = Duration::from_secs(120);

/// Spawn a background task that drops idle rate limiter buckets until `token`
/// is cancelled.
pub fn spawn_rate_limit_cleanup_task(
    state: Arc<RateLimiterState>,
    cleanup_interval: Option<Duration>,
    token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    let interval = cleanup_interval.unwrap_or(Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS));

    info!(
        interval_secs = interval.as_secs(),
        "Starting rate limiter cleanup task"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // Don't run immediately on startup
        ticker.tick().await;

        loop {
            tokio::select! {
                () = token.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = state.cleanup(IDLE_AFTER).await;
                    debug!(removed, "Rate limiter cleanup finished");
                }
            }
        }
    })
}
