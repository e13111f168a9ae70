//! Helpers shared across layers.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_validator`] - Absolute URL validation
//! - [`client_ip`] - Client identity for rate limiting

pub mod client_ip;
pub mod code_generator;
pub mod url_validator;
