//! Link entity representing a short code to URL mapping.

use chrono::{DateTime, Utc};

/// A stored short link.
///
/// `short_code` and `original_url` never change after creation. Only the
/// visit statistics (`last_used_at`, `visit_count`) are updated, by the
/// visit worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub visit_count: u64,
}

impl Link {
    /// Creates a link that has never been visited.
    pub fn new(
        id: i64,
        short_code: String,
        original_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_code,
            original_url,
            created_at,
            last_used_at: None,
            visit_count: 0,
        }
    }

    /// Returns a copy with the given visit statistics.
    pub fn with_visits(mut self, visit_count: u64, last_used_at: Option<DateTime<Utc>>) -> Self {
        self.visit_count = visit_count;
        self.last_used_at = last_used_at;
        self
    }

    /// Applies one visit at time `at`.
    pub fn record_visit(&mut self, at: DateTime<Utc>) {
        self.visit_count += 1;
        self.last_used_at = Some(at);
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub short_code: String,
    pub original_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "abc12345".to_string(),
            "https://example.com".to_string(),
            now,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.short_code, "abc12345");
        assert_eq!(link.original_url, "https://example.com");
        assert_eq!(link.created_at, now);
        assert!(link.last_used_at.is_none());
        assert_eq!(link.visit_count, 0);
    }

    #[test]
    fn test_link_record_visit() {
        let mut link = Link::new(
            1,
            "code".to_string(),
            "https://example.com".to_string(),
            Utc::now(),
        );
        let at = Utc::now();

        link.record_visit(at);
        link.record_visit(at);

        assert_eq!(link.visit_count, 2);
        assert_eq!(link.last_used_at, Some(at));
    }

    #[test]
    fn test_link_with_visits() {
        let at = Utc::now();
        let link = Link::new(
            7,
            "xyz".to_string(),
            "https://rust-lang.org".to_string(),
            Utc::now(),
        )
        .with_visits(3, Some(at));

        assert_eq!(link.visit_count, 3);
        assert_eq!(link.last_used_at, Some(at));
    }
}
