//! Validation of URLs submitted for shortening.
//!
//! A URL is accepted when it parses as an absolute URL and names a host.
//! Apart from surrounding whitespace the input is returned unchanged, so a
//! redirect reproduces exactly what the client submitted.

use url::Url;

/// Reasons a submitted URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is an absolute URL with a scheme and a host.
///
/// # Errors
///
/// - [`UrlValidationError::Empty`] for blank input
/// - [`UrlValidationError::InvalidFormat`] if parsing fails, including
///   relative references such as `not-a-valid-url`
/// - [`UrlValidationError::MissingHost`] for host-less URLs like
///   `mailto:a@b.c` or `data:text/plain,hi`
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com/path?q=1").is_ok());
/// assert!(validate_url("not-a-valid-url").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<&str, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(trimmed),
        _ => Err(UrlValidationError::MissingHost),
    }
}
