//! API route configuration.

use crate::api::handlers::{list_links_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// JSON API routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten` - Create a short link
/// - `GET  /urls`    - List every stored link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/urls", get(list_links_handler))
}
