//! HTTP middleware for request processing and protection.
//!
//! Provides per-client rate limiting, request tracing, CORS and panic
//! recovery.

pub mod cors;
pub mod rate_limit;
pub mod recover;
pub mod tracing;
