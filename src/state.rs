//! Shared application state injected into handlers and middleware.

use std::sync::Arc;

use axum::http::StatusCode;
use tokio::sync::mpsc;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;
use crate::domain::visit_event::VisitEvent;
use crate::infrastructure::rate_limit::RateLimiter;

/// Link service over whichever store backend was configured.
pub type DynLinkService = LinkService<dyn LinkRepository>;

/// Components shared by every request.
///
/// All fields are cheap to clone; each test can build its own isolated
/// instance.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub visit_sender: mpsc::Sender<VisitEvent>,
    /// Public origin for generated short URLs. Derived from `Host` when unset.
    pub base_url: Option<String>,
    pub redirect_status: StatusCode,
    /// Read client addresses from forwarding headers.
    pub behind_proxy: bool,
}

impl AppState {
    /// Creates state with `302 Found` redirects, no base URL and no proxy trust.
    pub fn new(
        link_service: Arc<DynLinkService>,
        rate_limiter: Arc<dyn RateLimiter>,
        visit_sender: mpsc::Sender<VisitEvent>,
    ) -> Self {
        Self {
            link_service,
            rate_limiter,
            visit_sender,
            base_url: None,
            redirect_status: StatusCode::FOUND,
            behind_proxy: false,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_redirect_status(mut self, status: StatusCode) -> Self {
        self.redirect_status = status;
        self
    }

    pub fn with_behind_proxy(mut self, behind_proxy: bool) -> Self {
        self.behind_proxy = behind_proxy;
        self
    }
}
