//! Sliding-window rate limiter for outbound provider calls.
//!
//! Keeps the timestamps of recent calls. At any instant, the number of
//! timestamps within the trailing window never exceeds `max_requests`.
//!
//! Timestamps use [`tokio::time::Instant`] so the limiter follows tokio's
//! paused clock in tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;

use crate::config::SearchConfig;

/// Sliding-window limiter shared by every in-flight query.
///
/// The window lock is only held while trimming and recording, never across
/// an await point, so dropping an `acquire` future mid-wait leaves the
/// window consistent.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    time_window: Duration,
    jitter_ms: (u64, u64),
    window: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` calls per `time_window`.
    ///
    /// A `max_requests` of 0 is treated as 1.
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        let max_requests = max_requests.max(1);
        Self {
            max_requests,
            time_window,
            jitter_ms: (0, 0),
            window: Mutex::new(VecDeque::with_capacity(max_requests)),
        }
    }

    /// Add a random `(min, max)` millisecond delay after each wait.
    pub fn with_jitter(mut self, jitter_ms: (u64, u64)) -> Self {
        self.jitter_ms = jitter_ms;
        self
    }

    /// Build a limiter from the rate fields of a validated config.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.max_requests_per_window, config.time_window())
            .with_jitter(config.rate_limit_jitter_ms)
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn time_window(&self) -> Duration {
        self.time_window
    }

    /// Wait until a call is permitted, then record it.
    ///
    /// Never fails; only delays.
    pub async fn acquire(&self) {
        loop {
            let wait = match self.try_record(Instant::now()) {
                None => return,
                Some(wait) => wait,
            };
            let jitter = self.jitter();
            tracing::trace!(
                wait_ms = wait.as_millis() as u64,
                jitter_ms = jitter.as_millis() as u64,
                "rate limit reached, waiting"
            );
            tokio::time::sleep(wait + jitter).await;
        }
    }

    /// Number of recorded calls still inside the trailing window.
    pub fn in_flight_window(&self) -> usize {
        let mut window = self.lock_window();
        Self::trim(&mut window, Instant::now(), self.time_window);
        window.len()
    }

    /// Records a call at `now` if the window has room; otherwise returns how
    /// long until the oldest retained call leaves the window.
    fn try_record(&self, now: Instant) -> Option<Duration> {
        let mut window = self.lock_window();
        Self::trim(&mut window, now, self.time_window);

        if window.len() < self.max_requests {
            window.push_back(now);
            return None;
        }

        // Non-empty: max_requests >= 1 and the window is full.
        let oldest = window.front().copied().unwrap_or(now);
        let wait = (oldest + self.time_window).saturating_duration_since(now);
        // A zero wait would spin; the oldest entry expires on the next trim.
        Some(wait.max(Duration::from_millis(1)))
    }

    fn trim(window: &mut VecDeque<Instant>, now: Instant, time_window: Duration) {
        while let Some(&oldest) = window.front() {
            if now.saturating_duration_since(oldest) >= time_window {
                window.pop_front();
            } else {
                break;
            }
        }
    }

    fn jitter(&self) -> Duration {
        let (min, max) = self.jitter_ms;
        if max == 0 || min > max {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    fn lock_window(&self) -> std::sync::MutexGuard<'_, VecDeque<Instant>> {
        // The window is valid after any panic: it only ever holds timestamps.
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn calls_under_limit_do_not_wait() {
        let limiter = RateLimiter::new(5, Duration::from_secs(1));
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.in_flight_window(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn call_over_limit_waits_for_window() {
        let limiter = RateLimiter::new(3, Duration::from_secs(2));
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_measured_from_oldest_retained_call() {
        let limiter = RateLimiter::new(2, Duration::from_secs(10));
        let start = Instant::now();
        limiter.acquire().await;
        tokio::time::advance(Duration::from_secs(4)).await;
        limiter.acquire().await;

        // Oldest call was at t=0, so the third waits until t=10, not t=14.
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_secs(14));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_trimmed() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1));
        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(limiter.in_flight_window(), 2);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(limiter.in_flight_window(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn window_never_exceeds_max_under_concurrency() {
        let limiter = Arc::new(RateLimiter::new(4, Duration::from_secs(1)));
        let start = Instant::now();

        let tasks: Vec<_> = (0..12)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.acquire().await;
                    assert!(limiter.in_flight_window() <= 4);
                    Instant::now()
                })
            })
            .collect();

        let mut stamps = Vec::new();
        for task in tasks {
            stamps.push(task.await.expect("task panicked"));
        }
        stamps.sort();

        // Any 5 consecutive calls must span at least the window.
        for pair in stamps.windows(5) {
            assert!(pair[4] - pair[0] >= Duration::from_secs(1));
        }
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_acquire_does_not_record() {
        let limiter = RateLimiter::new(1, Duration::from_secs(5));
        limiter.acquire().await;

        let timed_out =
            tokio::time::timeout(Duration::from_secs(1), limiter.acquire()).await;
        assert!(timed_out.is_err());
        assert_eq!(limiter.in_flight_window(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn jitter_extends_wait() {
        let limiter = RateLimiter::new(1, Duration::from_secs(1)).with_jitter((200, 200));
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(1_200));
    }

    #[test]
    fn zero_max_requests_clamped_to_one() {
        let limiter = RateLimiter::new(0, Duration::from_secs(1));
        assert_eq!(limiter.max_requests(), 1);
    }

    #[test]
    fn from_config_uses_rate_fields() {
        let config = SearchConfig {
            max_requests_per_window: 7,
            time_window_seconds: 2.5,
            ..Default::default()
        };
        let limiter = RateLimiter::from_config(&config);
        assert_eq!(limiter.max_requests(), 7);
        assert_eq!(limiter.time_window(), Duration::from_millis(2_500));
    }
}
