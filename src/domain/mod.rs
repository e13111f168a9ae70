//! Domain layer: entities, repository contracts and visit tracking.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Storage trait definitions
//! - [`visit_event`] - Visit model passed from redirects to the worker
//! - [`visit_worker`] - Background worker updating visit statistics
//!
//! The domain layer has no dependency on the HTTP or infrastructure layers.

pub mod entities;
pub mod repositories;
pub mod visit_event;
pub mod visit_worker;
