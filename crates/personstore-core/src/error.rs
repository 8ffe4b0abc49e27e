//! Shared error type across personstore crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed body.
    BadRequest,
    /// Target record does not exist.
    NotFound,
    /// Store reached its capacity ceiling.
    StoreFull,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::StoreFull => "STORE_FULL",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PersonStoreError>;

/// Unified error type used by core and the HTTP service.
///
/// The store never produces one of these; they originate in validation,
/// config loading, and the request layer.
#[derive(Debug, Error)]
pub enum PersonStoreError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("person not found")]
    NotFound,
    #[error("database full: cannot accept more records")]
    StoreFull,
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl PersonStoreError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            PersonStoreError::BadRequest(_) => ClientCode::BadRequest,
            PersonStoreError::NotFound => ClientCode::NotFound,
            PersonStoreError::StoreFull => ClientCode::StoreFull,
            PersonStoreError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            PersonStoreError::Internal(_) => ClientCode::Internal,
        }
    }
}
