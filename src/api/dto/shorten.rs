//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
///
/// `url` is optional at the serde level so that a missing field reaches
/// validation and is reported as a 400 with a field message.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(required(message = "url is required"))]
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub url: Option<String>,
}

/// Response for a created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub original_url: String,
    pub short_url: String,
}
