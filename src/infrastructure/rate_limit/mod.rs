//! Per-client admission control.
//!
//! Provides a [`RateLimiter`] trait with two implementations:
//! - [`MemoryRateLimiter`] - counters in process memory
//! - [`RedisRateLimiter`] - counters shared through Redis

mod memory_limiter;
mod redis_limiter;
mod service;

pub use memory_limiter::MemoryRateLimiter;
pub use redis_limiter::{RateLimitBackendError, RedisRateLimiter};
pub use service::{RateDecision, RateLimiter};
