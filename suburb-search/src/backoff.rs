//! Retry backoff policy and the sleep primitive it is paired with.
//!
//! [`BackoffPolicy`] is a pure attempt → delay mapping. The orchestrator
//! performs the actual wait through a [`Sleeper`], so retry paths can be
//! tested without real time passing.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// `base * attempt`
    Linear,
    /// `base * 2^(attempt - 1)`
    Exponential,
}

/// Delay schedule applied between failed provider attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffPolicy {
    pub strategy: BackoffStrategy,
    /// Delay after the first failed attempt, in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            strategy: BackoffStrategy::Exponential,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

impl BackoffPolicy {
    /// A policy that never waits. Useful for tests and local stubs.
    pub fn none() -> Self {
        Self {
            strategy: BackoffStrategy::Linear,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// Attempt 0 is treated as attempt 1. The result never exceeds
    /// `max_delay_ms`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        let raw = match self.strategy {
            BackoffStrategy::Linear => self.base_delay_ms.saturating_mul(u64::from(attempt)),
            BackoffStrategy::Exponential => {
                let factor = 1u64.checked_shl(attempt - 1).unwrap_or(u64::MAX);
                self.base_delay_ms.saturating_mul(factor)
            }
        };
        Duration::from_millis(raw.min(self.max_delay_ms))
    }
}

/// Suspends the current task for a duration.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// [`Sleeper`] backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
