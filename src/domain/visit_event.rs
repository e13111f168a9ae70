//! Visit event model for asynchronous visit tracking.

use chrono::{DateTime, Utc};

/// A redirect that should be counted against a link.
///
/// Sent from the redirect handler to the background worker over a bounded
/// channel so the redirect response never waits on a storage write.
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub short_code: String,
    pub visited_at: DateTime<Utc>,
}

impl VisitEvent {
    /// Creates an event stamped with the current time.
    pub fn new(short_code: String) -> Self {
        Self {
            short_code,
            visited_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_event_creation() {
        let before = Utc::now();
        let event = VisitEvent::new("abc12345".to_string());

        assert_eq!(event.short_code, "abc12345");
        assert!(event.visited_at >= before);
    }
}
