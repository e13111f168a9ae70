//! Handler for listing every stored link.

use axum::{Json, extract::State};

use crate::api::dto::links::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns all links in the order they were created.
///
/// # Endpoint
///
/// `GET /api/urls`
///
/// # Response
///
/// ```json
/// [
///   {
///     "short_code": "aZ3k9QxP",
///     "original_url": "https://example.com",
///     "created_at": "2025-01-01T12:00:00Z",
///     "last_used_at": null,
///     "visit_count": 0
///   }
/// ]
/// ```
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_all().await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}
