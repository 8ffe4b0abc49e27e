//! Person CRUD endpoints.
//!
//! Handlers validate input, call exactly one store operation, and translate
//! its outcome into a response plus the matching store metrics. Request-level
//! metrics are added by [`instrument`].

pub mod error;
pub mod handlers;
pub mod instrument;

pub use error::ApiError;
