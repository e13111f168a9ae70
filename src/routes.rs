//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /api/shorten` - Create a short link (rate limited)
//! - `GET  /api/urls`    - List links (rate limited)
//! - `GET  /r/{code}`    - Short link redirect (rate limited)
//! - `GET  /health`      - Health check (not rate limited)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin may call the API
//! - **Panic recovery** - Handler panics become JSON `500` responses
//! - **Rate limiting** - Per-client fixed window, shared by all limited routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{
    health_handler, method_not_allowed_handler, not_found_handler, redirect_handler,
};
use crate::api::middleware::{cors, rate_limit, recover, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and middleware except path normalization.
///
/// The rate limiter is attached with `route_layer`, so requests that match no
/// route or method fall through to the JSON 404/405 fallbacks without being
/// counted.
pub fn build_router(state: AppState) -> Router {
    let api_router = api::routes::api_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit::layer,
    ));

    let redirect_router = Router::new()
        .route("/r/{code}", get(redirect_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::layer,
        ));

    Router::new()
        .nest("/api", api_router)
        .merge(redirect_router)
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .method_not_allowed_fallback(method_not_allowed_handler)
        .with_state(state)
        .layer(recover::layer())
        .layer(cors::layer())
        .layer(tracing::layer())
}

/// Constructs the application router, trimming trailing slashes before routing.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}
