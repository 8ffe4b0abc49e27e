//! Top-level facade crate for personstore.
//!
//! Re-exports the record store and the HTTP service so users can depend on a single crate.

pub mod core {
    pub use personstore_core::*;
}

pub mod api {
    pub use personstore_api::*;
}
