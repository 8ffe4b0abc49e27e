//! personstore core: the person record model, the concurrent in-memory store,
//! and the error surface shared with the HTTP service.
//!
//! This crate carries no transport or runtime dependencies so the store can be
//! instantiated and exercised in isolation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Store operations report absence through `Option`/`bool`, never by failing.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod person;
pub mod store;

/// Shared result type.
pub use error::{PersonStoreError, Result};
pub use person::{NewPerson, Person, PersonPatch};
pub use store::{PersonStore, MAX_RECORDS};
