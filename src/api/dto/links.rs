//! DTOs for the link listing endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

/// One stored link as returned by `GET /api/urls`.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub visit_count: u64,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            short_code: link.short_code,
            original_url: link.original_url,
            created_at: link.created_at,
            last_used_at: link.last_used_at,
            visit_count: link.visit_count,
        }
    }
}
