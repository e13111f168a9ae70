//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Store**: Counts stored links
/// 2. **Rate limiter**: Backend reachability (always ok in memory)
/// 3. **Visit queue**: Channel open, free capacity
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;
    let limiter_check = check_rate_limiter(&state).await;
    let queue_check = check_visit_queue(&state);

    let all_healthy = store_check.is_ok() && limiter_check.is_ok() && queue_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store: store_check,
            rate_limiter: limiter_check,
            visit_queue: queue_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> CheckStatus {
    match state.link_service.count().await {
        Ok(count) => CheckStatus::ok(format!("{} links stored", count)),
        Err(e) => CheckStatus::error(format!("Store error: {}", e)),
    }
}

async fn check_rate_limiter(state: &AppState) -> CheckStatus {
    if state.rate_limiter.health_check().await {
        CheckStatus::ok(format!("{} requests per window", state.rate_limiter.limit()))
    } else {
        CheckStatus::error("Rate limit backend unreachable")
    }
}

fn check_visit_queue(state: &AppState) -> CheckStatus {
    if state.visit_sender.is_closed() {
        CheckStatus::error("Visit queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.visit_sender.capacity()))
    }
}
