use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

/// Rolling-window rate limiter shared by every fetch task in a crawl run.
///
/// Permits at most `max_calls` acquisitions within any trailing `period`.
/// The window is an ordered sequence of call timestamps, pruned on every
/// acquisition; the mutex serializes the read-modify-write so concurrent
/// callers cannot overshoot the quota between check and append.
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, period: Duration) -> Self {
        Self {
            max_calls,
            period,
            timestamps: Mutex::new(VecDeque::with_capacity(max_calls)),
        }
    }

    /// Convenience constructor for an N-requests-per-second quota.
    pub fn per_second(requests_per_second: u32) -> Self {
        Self::new(requests_per_second as usize, Duration::from_secs(1))
    }

    /// Suspends until issuing one more call stays within the quota, then
    /// records the call's timestamp.
    pub async fn acquire(&self) {
        loop {
            let now = Instant::now();
            let mut stamps = self.timestamps.lock().await;

            while stamps
                .front()
                .is_some_and(|&oldest| now.duration_since(oldest) >= self.period)
            {
                stamps.pop_front();
            }

            if stamps.len() < self.max_calls {
                stamps.push_back(now);
                return;
            }

            // Full window: sleep until the oldest call ages out, then
            // re-evaluate. Another task may have recorded calls while we
            // slept, so the wait is never assumed to be sufficient.
            let oldest = *stamps
                .front()
                .unwrap_or(&now);
            let wait = self.period.saturating_sub(now.duration_since(oldest));
            drop(stamps);

            if wait.is_zero() {
                continue;
            }
            trace!(?wait, "rate limiter window full, waiting");
            tokio::time::sleep(wait).await;
        }
    }
}
