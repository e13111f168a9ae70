//! Link creation and retrieval service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_url;

/// Insert attempts before code generation gives up.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Service for creating and retrieving shortened links.
///
/// Shortening never deduplicates: every call creates a new record with its
/// own code, even for a URL that is already stored.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    code_generator: Arc<dyn CodeGenerator>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>, code_generator: Arc<dyn CodeGenerator>) -> Self {
        Self {
            link_repository,
            code_generator,
        }
    }

    /// Validates `original_url` and stores it under a freshly generated code.
    ///
    /// Each candidate code is inserted atomically; a uniqueness conflict
    /// triggers a new candidate, up to [`MAX_GENERATION_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not absolute or has no host.
    /// Returns [`AppError::GenerationExhausted`] if every candidate collided.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn shorten(&self, original_url: &str) -> Result<Link, AppError> {
        let original_url = validate_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let new_link = NewLink {
                short_code: self.code_generator.generate(),
                original_url: original_url.to_string(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    metrics::counter!("links_created_total").increment(1);
                    debug!(code = %link.short_code, attempt, "Short link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => {
                    warn!(attempt, "Short code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        metrics::counter!("code_generation_exhausted_total").increment(1);

        Err(AppError::generation_exhausted(
            "Failed to generate unique code",
            json!({ "attempts": MAX_GENERATION_ATTEMPTS }),
        ))
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn get_link(&self, short_code: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("URL not found", json!({ "short_code": short_code }))
            })
    }

    /// Resolves a short code to the URL it was created for.
    ///
    /// # Errors
    ///
    /// See [`Self::get_link`].
    pub async fn resolve(&self, short_code: &str) -> Result<String, AppError> {
        self.get_link(short_code).await.map(|l| l.original_url)
    }

    /// Lists every link in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_all().await
    }

    /// Number of stored links.
    pub async fn count(&self) -> Result<u64, AppError> {
        self.link_repository.count().await
    }

    /// Builds the public short URL for a code.
    pub fn get_short_url(&self, base_url: &str, short_code: &str) -> String {
        format!("{}/r/{}", base_url.trim_end_matches('/'), short_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Hands out codes from a fixed list, then repeats the last one.
    struct SequenceGenerator {
        codes: Mutex<Vec<&'static str>>,
    }

    impl SequenceGenerator {
        fn new(mut codes: Vec<&'static str>) -> Self {
            codes.reverse();
            Self {
                codes: Mutex::new(codes),
            }
        }
    }

    impl CodeGenerator for SequenceGenerator {
        fn generate(&self) -> String {
            let mut codes = self.codes.lock().unwrap();
            if codes.len() > 1 {
                codes.pop().unwrap().to_string()
            } else {
                codes[0].to_string()
            }
        }
    }

    fn create_test_link(id: i64, code: &str, url: &str) -> Link {
        Link::new(id, code.to_string(), url.to_string(), Utc::now())
    }

    fn service(repo: MockLinkRepository, codes: Vec<&'static str>) -> LinkService<MockLinkRepository> {
        LinkService::new(Arc::new(repo), Arc::new(SequenceGenerator::new(codes)))
    }

    #[tokio::test]
    async fn test_shorten_success() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_create()
            .withf(|new_link| {
                new_link.short_code == "abc12345" && new_link.original_url == "https://example.com"
            })
            .times(1)
            .returning(|n| Ok(create_test_link(1, &n.short_code, &n.original_url)));

        let result = service(mock_link_repo, vec!["abc12345"])
            .shorten("https://example.com")
            .await;

        let link = result.unwrap();
        assert_eq!(link.short_code, "abc12345");
        assert_eq!(link.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_shorten_keeps_url_exactly() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_create()
            .withf(|new_link| new_link.original_url == "https://EXAMPLE.COM:443/Path")
            .times(1)
            .returning(|n| Ok(create_test_link(1, &n.short_code, &n.original_url)));

        let result = service(mock_link_repo, vec!["code0001"])
            .shorten("https://EXAMPLE.COM:443/Path")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shorten_invalid_url() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_create().times(0);

        let result = service(mock_link_repo, vec!["unused00"])
            .shorten("not-a-valid-url")
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_retries_on_collision() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_create()
            .withf(|n| n.short_code == "taken000")
            .times(1)
            .returning(|_| Err(AppError::conflict("taken", json!({}))));
        mock_link_repo
            .expect_create()
            .withf(|n| n.short_code == "fresh000")
            .times(1)
            .returning(|n| Ok(create_test_link(2, &n.short_code, &n.original_url)));

        let result = service(mock_link_repo, vec!["taken000", "fresh000"])
            .shorten("https://example.com")
            .await;

        assert_eq!(result.unwrap().short_code, "fresh000");
    }

    #[tokio::test]
    async fn test_shorten_generation_exhausted() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_create()
            .times(MAX_GENERATION_ATTEMPTS)
            .returning(|_| Err(AppError::conflict("taken", json!({}))));

        let result = service(mock_link_repo, vec!["always00"])
            .shorten("https://example.com")
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::GenerationExhausted { .. }
        ));
    }

    #[tokio::test]
    async fn test_shorten_propagates_storage_error() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let result = service(mock_link_repo, vec!["abc12345"])
            .shorten("https://example.com")
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_find_by_code()
            .withf(|code| code == "abc12345")
            .times(1)
            .returning(|c| Ok(Some(create_test_link(1, c, "https://example.com/target"))));

        let url = service(mock_link_repo, vec!["unused00"])
            .resolve("abc12345")
            .await
            .unwrap();

        assert_eq!(url, "https://example.com/target");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(mock_link_repo, vec!["unused00"])
            .resolve("missing")
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[test]
    fn test_get_short_url() {
        let svc = service(MockLinkRepository::new(), vec!["unused00"]);

        assert_eq!(
            svc.get_short_url("http://localhost:8080/", "abc12345"),
            "http://localhost:8080/r/abc12345"
        );
        assert_eq!(
            svc.get_short_url("https://s.example.com", "xyz"),
            "https://s.example.com/r/xyz"
        );
    }
}
