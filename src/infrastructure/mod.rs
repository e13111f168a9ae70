//! Infrastructure layer: concrete storage and rate limiting backends.
//!
//! - [`persistence`] - Link repositories (in-memory and PostgreSQL)
//! - [`rate_limit`] - Fixed-window limiters (in-memory and Redis)

pub mod persistence;
pub mod rate_limit;
