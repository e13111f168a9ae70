//! Handlers for requests that match no route or no method.

use axum::http::{Method, Uri};
use serde_json::json;

use crate::error::AppError;

/// `404` for paths with no route.
pub async fn not_found_handler(uri: Uri) -> AppError {
    AppError::not_found("Route not found", json!({ "path": uri.path() }))
}

/// `405` for known paths requested with an unsupported method.
pub async fn method_not_allowed_handler(method: Method, uri: Uri) -> AppError {
    AppError::method_not_allowed(
        "Method not allowed",
        json!({ "method": method.as_str(), "path": uri.path() }),
    )
}
