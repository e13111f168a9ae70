#![allow(dead_code)]

use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tinylink::application::services::LinkService;
use tinylink::domain::repositories::LinkRepository;
use tinylink::domain::visit_event::VisitEvent;
use tinylink::infrastructure::persistence::MemoryLinkRepository;
use tinylink::infrastructure::rate_limit::MemoryRateLimiter;
use tinylink::routes::{app_router, build_router};
use tinylink::state::AppState;
use tinylink::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use tokio::sync::mpsc;

pub const TEST_BASE_URL: &str = "https://s.example.com";

/// Isolated application wired to in-memory backends.
pub struct TestApp {
    pub state: AppState,
    pub repository: Arc<MemoryLinkRepository>,
    pub rate_limiter: Arc<MemoryRateLimiter>,
    pub visits: mpsc::Receiver<VisitEvent>,
}

impl TestApp {
    pub fn server(&self) -> TestServer {
        TestServer::new(build_router(self.state.clone())).unwrap()
    }

    /// Serves the full application over a real socket, as `server::run` does:
    /// trailing slashes are trimmed and clients are keyed by peer address.
    pub fn http_server(&self) -> TestServer {
        let app = ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(
            app_router(self.state.clone()),
        );

        TestServer::builder().http_transport().build(app).unwrap()
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(20, Duration::from_secs(60), Arc::new(RandomCodeGenerator::default()))
}

pub fn create_test_app_with_limit(limit: u32) -> TestApp {
    create_test_app_with(limit, Duration::from_secs(60), Arc::new(RandomCodeGenerator::default()))
}

pub fn create_test_app_with(
    limit: u32,
    window: Duration,
    code_generator: Arc<dyn CodeGenerator>,
) -> TestApp {
    let repository = Arc::new(MemoryLinkRepository::new());
    let (tx, rx) = mpsc::channel(100);

    let store: Arc<dyn LinkRepository> = repository.clone();
    let link_service = Arc::new(LinkService::new(store, code_generator));
    let rate_limiter = Arc::new(MemoryRateLimiter::new(limit, window));

    let state = AppState::new(link_service, rate_limiter.clone(), tx)
        .with_base_url(Some(TEST_BASE_URL.to_string()));

    TestApp {
        state,
        repository,
        rate_limiter,
        visits: rx,
    }
}

/// Always returns the same code.
pub struct FixedCodeGenerator(pub &'static str);

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}
