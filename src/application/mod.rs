//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers a small API.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation, lookup and listing

pub mod services;
