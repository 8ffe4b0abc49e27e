//! personstore HTTP service library entry.
//!
//! Wires config, the record store, CRUD handlers, request instrumentation and
//! the process sampler into one service. Consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
