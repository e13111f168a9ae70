//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /r/{code}`
///
/// # Request Flow
///
/// 1. Resolve the code through the link service
/// 2. Queue a visit event for the background worker
/// 3. Respond with the configured redirect status (302 by default)
///
/// # Visit Tracking
///
/// Visit events go to a bounded channel. If the queue is full the visit is
/// dropped so the redirect never waits.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let original_url = state.link_service.resolve(&code).await?;

    let event = VisitEvent::new(code);
    if state.visit_sender.try_send(event).is_err() {
        metrics::counter!("visits_dropped_total").increment(1);
        debug!("Visit queue full or closed, visit dropped");
    }

    redirect_response(state.redirect_status, &original_url)
}

/// Builds a redirect with `Location` set to `location`.
///
/// Stored URLs are used verbatim when they are valid header values. Anything
/// else (control characters) is sent in its serialized, percent-encoded form,
/// which names the same resource.
fn redirect_response(status: StatusCode, location: &str) -> Result<Response, AppError> {
    let value = match HeaderValue::from_str(location) {
        Ok(value) => value,
        Err(_) => Url::parse(location)
            .ok()
            .and_then(|u| HeaderValue::from_str(u.as_str()).ok())
            .ok_or_else(|| {
                AppError::internal(
                    "Stored URL cannot be used as a redirect target",
                    json!({ "url": location }),
                )
            })?,
    };

    Ok((status, [(header::LOCATION, value)]).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_response_verbatim() {
        let response = redirect_response(StatusCode::FOUND, "https://example.com/a?b=c").unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://example.com/a?b=c"
        );
    }

    #[test]
    fn test_redirect_response_encodes_control_characters() {
        let response =
            redirect_response(StatusCode::MOVED_PERMANENTLY, "https://example.com/a\u{7f}b")
                .unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://example.com/a%7Fb"
        );
    }
}
