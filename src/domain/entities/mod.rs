//! Core domain entities.
//!
//! Entities are plain data structures. Creation input is split from the stored
//! record: [`NewLink`] carries what the caller decides, [`Link`] adds what the
//! store assigns (`id`, `created_at`) and the visit statistics.

pub mod link;

pub use link::{Link, NewLink};
