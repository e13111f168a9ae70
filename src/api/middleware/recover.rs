//! Panic recovery.

use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::AppError;

/// Converts a caught panic payload into a response.
pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Turns a panicking handler into a JSON `500 internal_error` response.
///
/// The connection and the server keep running; the panic message is logged
/// but never sent to the client.
pub fn layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let reason = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    tracing::error!(reason, "Request handler panicked");

    AppError::internal("Internal server error", json!({})).into_response()
}
