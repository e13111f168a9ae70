//! Fixed-window rate limiting middleware.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

use crate::error::AppError;
use crate::infrastructure::rate_limit::RateDecision;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Identity for requests with no resolvable address (e.g. in-process tests).
const UNKNOWN_CLIENT: &str = "unknown";

/// Admits or rejects a request before it reaches a handler.
///
/// # Key Extraction
///
/// The client is identified by its peer IP address, or by forwarding headers
/// when `AppState::behind_proxy` is set. See [`client_ip`].
///
/// # Responses
///
/// - Admitted requests continue and carry `X-RateLimit-Limit` and
///   `X-RateLimit-Remaining` headers.
/// - Rejected requests receive `429 Too Many Requests` with `Retry-After`.
///
/// # Example
///
/// ```rust,ignore
/// let limited = Router::new()
///     .route("/api/urls", get(list_links_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let identity = client_ip(req.headers(), peer, st.behind_proxy)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    match st.rate_limiter.admit(&identity).await {
        RateDecision::Admitted { remaining } => {
            let mut response = next.run(req).await;
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(st.rate_limiter.limit()));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));

            Ok(response)
        }
        decision @ RateDecision::Limited { .. } => {
            metrics::counter!("rate_limited_requests_total").increment(1);
            tracing::debug!(client = %identity, "Rate limit exceeded");

            Err(AppError::rate_limited(decision.retry_after_secs()))
        }
    }
}
