//! Rate limiter trait and decision type.

use async_trait::async_trait;
use std::time::Duration;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The request was counted; `remaining` more fit in the current window.
    Admitted { remaining: u32 },
    /// The window is full. Nothing was counted.
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }

    /// Seconds until the window resets, rounded up, at least 1.
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            Self::Admitted { .. } => 0,
            Self::Limited { retry_after } => {
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                secs.max(1)
            }
        }
    }
}

/// Fixed-window admission control keyed by client identity.
///
/// Each client may make at most [`RateLimiter::limit`] requests per window.
/// The read-check-increment of a client's counter is atomic, so concurrent
/// requests from one client cannot exceed the limit.
///
/// # Implementations
///
/// - [`crate::infrastructure::rate_limit::MemoryRateLimiter`] - per-process counters
/// - [`crate::infrastructure::rate_limit::RedisRateLimiter`] - counters shared through Redis
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Counts one request for `client_id` if the window has room.
    async fn admit(&self, client_id: &str) -> RateDecision;

    /// Requests allowed per window.
    fn limit(&self) -> u32;

    /// Reports whether the backing store is reachable.
    async fn health_check(&self) -> bool;
}
