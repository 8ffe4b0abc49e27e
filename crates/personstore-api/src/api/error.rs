//! HTTP mapping for [`PersonStoreError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use personstore_core::error::{ClientCode, PersonStoreError};

/// Handler error; renders as `{"code": ..., "msg": ...}`.
#[derive(Debug)]
pub struct ApiError(pub PersonStoreError);

impl From<PersonStoreError> for ApiError {
    fn from(e: PersonStoreError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::BadRequest | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
            ClientCode::NotFound => StatusCode::NOT_FOUND,
            ClientCode::StoreFull => StatusCode::INSUFFICIENT_STORAGE,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "code": self.0.client_code().as_str(),
            "msg": self.0.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
