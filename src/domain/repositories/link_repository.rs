//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage interface for short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryLinkRepository`] - in-process store
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link if its short code is not taken.
    ///
    /// The check and the insert are a single atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code already exists.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError>;

    /// Lists every link in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_all(&self) -> Result<Vec<Link>, AppError>;

    /// Counts stored links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count(&self) -> Result<u64, AppError>;

    /// Increments the visit counter and sets `last_used_at`.
    ///
    /// Returns `Ok(false)` if no link has this code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn record_visit(&self, short_code: &str, at: DateTime<Utc>) -> Result<bool, AppError>;
}
