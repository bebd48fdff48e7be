//! Minimum-interval throttling between outbound requests

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum spacing between two dispatches from the same client
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(100);

/// Tracks when the owning client last dispatched a request.
///
/// Each client owns its own `Throttle`; instances never coordinate.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new() -> Self {
        Self::with_interval(MIN_REQUEST_INTERVAL)
    }

    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until the minimum interval since the last dispatch has passed,
    /// then stamp the cursor. Returns how long the caller was held back.
    ///
    /// The lock is held across the sleep so concurrent callers sharing one
    /// client are spaced out as well.
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last_request.lock().await;

        let mut waited = Duration::ZERO;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                waited = self.min_interval - elapsed;
                tokio::time::sleep(waited).await;
            }
        }

        *last = Some(Instant::now());
        waited
    }

    /// Timestamp of the last dispatch, if any
    pub async fn last_request(&self) -> Option<Instant> {
        *self.last_request.lock().await
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new()
    }
}
