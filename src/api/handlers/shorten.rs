//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "short_code": "aZ3k9QxP",
///   "original_url": "https://example.com",
///   "short_url": "http://localhost:8080/r/aZ3k9QxP"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the body is not JSON, `url` is missing or not a string, or the
///   URL is not absolute
/// - 500 if no unique code could be generated
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let url = payload
        .url
        .ok_or_else(|| AppError::bad_request("url is required", json!({ "field": "url" })))?;

    let link = state.link_service.shorten(&url).await?;

    let base_url = public_base_url(&state, &headers);
    let short_url = state
        .link_service
        .get_short_url(&base_url, &link.short_code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            short_code: link.short_code,
            original_url: link.original_url,
            short_url,
        }),
    ))
}

/// Configured base URL, else `http://{Host}`, else empty (relative short URL).
fn public_base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = &state.base_url {
        return base.clone();
    }

    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|host| format!("http://{}", host))
        .unwrap_or_default()
}
