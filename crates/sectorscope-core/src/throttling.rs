use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

/// Default pacing budget: 12 upstream requests per second, shared across all
/// fetch workers.
pub const DEFAULT_QUOTA_WINDOW: Duration = Duration::from_secs(1);
pub const DEFAULT_QUOTA_LIMIT: u32 = 12;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared request pacer that spreads upstream calls over a quota window.
///
/// One pacer is cloned into every fetch worker, so the budget is global to
/// the run rather than per task.
#[derive(Clone)]
pub struct RequestPacer {
    limiter: Arc<DirectRateLimiter>,
    step: Duration,
}

impl Default for RequestPacer {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTA_WINDOW, DEFAULT_QUOTA_LIMIT)
    }
}

impl RequestPacer {
    pub fn new(quota_window: Duration, quota_limit: u32) -> Self {
        let quota = quota_from_window(quota_window, quota_limit);
        let safe_limit = quota_limit.max(1);
        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            step: quota_window / safe_limit,
        }
    }

    /// Tries to take rate budget. When the window is exhausted the suggested
    /// wait before retrying is returned instead.
    pub fn acquire(&self) -> Result<(), Duration> {
        if self.limiter.check().is_ok() {
            return Ok(());
        }
        Err(self.step)
    }

    /// Waits until budget is available.
    pub async fn throttle(&self) {
        while let Err(delay) = self.acquire() {
            tokio::time::sleep(delay).await;
        }
    }
}

fn quota_from_window(quota_window: Duration, quota_limit: u32) -> Quota {
    let safe_limit = quota_limit.max(1);
    let burst = NonZeroU32::new(safe_limit).expect("safe limit must be non-zero");

    let seconds_per_cell = (quota_window.as_secs_f64() / f64::from(safe_limit)).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    Quota::with_period(period)
        .expect("period is always greater than zero")
        .allow_burst(burst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_once_the_window_is_exhausted() {
        let pacer = RequestPacer::new(Duration::from_secs(60), 2);

        assert!(pacer.acquire().is_ok());
        assert!(pacer.acquire().is_ok());

        let delay = pacer.acquire().expect_err("third request should wait");
        assert_eq!(delay, Duration::from_secs(30));
    }

    #[test]
    fn clones_share_one_budget() {
        let pacer = RequestPacer::new(Duration::from_secs(60), 1);
        let worker = pacer.clone();

        assert!(pacer.acquire().is_ok());
        assert!(worker.acquire().is_err());
    }
}
