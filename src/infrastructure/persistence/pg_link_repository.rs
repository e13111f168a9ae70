//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for link storage and retrieval.
///
/// Code uniqueness is enforced by the `links.code` unique constraint, so
/// concurrent inserts of the same code resolve in the database.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct LinkRow {
    id: i64,
    code: String,
    long_url: String,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
    visit_count: i64,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(row.id, row.code, row.long_url, row.created_at)
            .with_visits(row.visit_count.max(0) as u64, row.last_used_at)
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (code, long_url)
            VALUES ($1, $2)
            ON CONFLICT (code) DO NOTHING
            RETURNING id, code, long_url, created_at, last_used_at, visit_count
            "#,
        )
        .bind(&new_link.short_code)
        .bind(&new_link.original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from).ok_or_else(|| {
            AppError::conflict(
                "Short code already exists",
                json!({ "short_code": new_link.short_code }),
            )
        })
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, long_url, created_at, last_used_at, visit_count
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, code, long_url, created_at, last_used_at, visit_count
            FROM links
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn count(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn record_visit(&self, short_code: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET visit_count = visit_count + 1, last_used_at = $2
            WHERE code = $1
            "#,
        )
        .bind(short_code)
        .bind(at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
