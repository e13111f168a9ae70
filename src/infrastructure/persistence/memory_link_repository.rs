//! In-process link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    links: Vec<Link>,
    by_code: HashMap<String, usize>,
}

/// Link store kept in memory for the lifetime of the process.
///
/// Links are held in insertion order with a code index on the side. One
/// `RwLock` guards both, so the uniqueness check and the insert happen under
/// the same write lock. The lock is never held across an `.await`.
#[derive(Default)]
pub struct MemoryLinkRepository {
    inner: RwLock<Inner>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> AppError {
    AppError::internal("Link store lock poisoned", json!({}))
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        if inner.by_code.contains_key(&new_link.short_code) {
            return Err(AppError::conflict(
                "Short code already exists",
                json!({ "short_code": new_link.short_code }),
            ));
        }

        let index = inner.links.len();
        let link = Link::new(
            index as i64 + 1,
            new_link.short_code,
            new_link.original_url,
            Utc::now(),
        );

        inner.by_code.insert(link.short_code.clone(), index);
        inner.links.push(link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;

        Ok(inner
            .by_code
            .get(short_code)
            .map(|&index| inner.links[index].clone()))
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.links.clone())
    }

    async fn count(&self) -> Result<u64, AppError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.links.len() as u64)
    }

    async fn record_visit(&self, short_code: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        let Some(&index) = inner.by_code.get(short_code) else {
            return Ok(false);
        };

        inner.links[index].record_visit(at);
        Ok(true)
    }
}
