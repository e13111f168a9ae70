//! HTTP server initialization and runtime setup.
//!
//! Selects storage and rate limit backends, spawns background workers, and
//! runs the Axum server until a shutdown signal arrives.

use crate::application::services::LinkService;
use crate::config::Config;
use crate::domain::repositories::LinkRepository;
use crate::domain::visit_worker::run_visit_worker;
use crate::infrastructure::persistence::{MemoryLinkRepository, PgLinkRepository};
use crate::infrastructure::rate_limit::{MemoryRateLimiter, RateLimiter, RedisRateLimiter};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use axum::http::StatusCode;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link store (PostgreSQL with migrations, or in-memory)
/// - Rate limiter (Redis, or in-memory with a sweeper task)
/// - Background visit worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let link_repository = build_link_repository(&config).await?;
    let rate_limiter = build_rate_limiter(&config).await;

    let (visit_tx, visit_rx) = mpsc::channel(config.visit_queue_capacity);
    tokio::spawn(run_visit_worker(visit_rx, link_repository.clone()));
    tracing::info!("Visit worker started");

    let code_generator = Arc::new(RandomCodeGenerator::new(config.code_length));
    let link_service = Arc::new(LinkService::new(link_repository, code_generator));

    let redirect_status =
        StatusCode::from_u16(config.redirect_status).context("Invalid REDIRECT_STATUS")?;

    let state = AppState::new(link_service, rate_limiter, visit_tx)
        .with_base_url(config.base_url.clone())
        .with_redirect_status(redirect_status)
        .with_behind_proxy(config.behind_proxy);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn build_link_repository(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    let Some(database_url) = &config.database_url else {
        tracing::info!("Store: in-memory (links are lost on restart)");
        return Ok(Arc::new(MemoryLinkRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
}

async fn build_rate_limiter(config: &Config) -> Arc<dyn RateLimiter> {
    let limit = config.rate_limit_requests;
    let window = config.rate_limit_window();

    if let Some(redis_url) = &config.redis_url {
        match RedisRateLimiter::connect(redis_url, limit, window).await {
            Ok(limiter) => {
                tracing::info!("Rate limiter enabled (Redis)");
                return Arc::new(limiter);
            }
            Err(e) => {
                tracing::warn!("{}. Using in-memory rate limiter.", e);
            }
        }
    }

    let limiter = Arc::new(MemoryRateLimiter::new(limit, window));
    limiter.clone().spawn_sweeper(window);
    tracing::info!("Rate limiter enabled (in-memory)");
    limiter
}

/// Resolves when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
