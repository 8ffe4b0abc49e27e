use std::num::IntErrorKind;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;

use personstore_core::error::PersonStoreError;
use personstore_core::{NewPerson, Person, PersonPatch};

use crate::api::ApiError;
use crate::app_state::AppState;

type ApiResult<T> = std::result::Result<T, ApiError>;

// --------------------
// Query parsing
// --------------------
/// Raw list parameters. Kept as strings so junk input degrades to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub start: Option<String>,
    pub count: Option<String>,
}

impl ListQuery {
    /// `(start, count)`: start clamped at 0, count defaulted and capped.
    pub fn resolve(&self, default_count: usize, max_count: usize) -> (usize, usize) {
        let start = parse_clamped(self.start.as_deref()).unwrap_or(0);
        let count = parse_clamped(self.count.as_deref())
            .unwrap_or(default_count)
            .min(max_count);
        (start, count)
    }
}

/// Integer parse that saturates: out-of-range digits map to `0` or
/// `usize::MAX`, only non-numeric input yields `None`.
fn parse_clamped(v: Option<&str>) -> Option<usize> {
    match v?.trim().parse::<i64>() {
        Ok(n) => Some(usize::try_from(n.max(0)).unwrap_or(usize::MAX)),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(usize::MAX),
            IntErrorKind::NegOverflow => Some(0),
            _ => None,
        },
    }
}

fn not_found(app: &AppState) -> ApiError {
    app.metrics().not_found.inc();
    ApiError(PersonStoreError::NotFound)
}

fn invalid_json(e: serde_json::Error) -> ApiError {
    ApiError(PersonStoreError::BadRequest(format!("invalid JSON: {e}")))
}

// --------------------
// Handlers
// --------------------
pub async fn list_persons(
    State(app): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Json<Vec<Person>> {
    let lc = &app.cfg().list;
    let (start, count) = q.resolve(lc.default_count, lc.max_count);

    let page = app.store().list(start, count);
    app.refresh_store_gauge();
    Json(page)
}

pub async fn get_person(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Person>> {
    let p = app.store().get(&id).ok_or_else(|| not_found(&app))?;
    app.refresh_store_gauge();
    Ok(Json(p))
}

pub async fn create_person(
    State(app): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Person>)> {
    let metrics = app.metrics();
    // size is recorded before we know whether the body is usable
    metrics.payload_size.observe(body.len() as f64);

    let new: NewPerson = serde_json::from_slice(&body).map_err(invalid_json)?;
    new.validate()?;

    let Some(created) = app.store().try_create(new) else {
        tracing::warn!(max = app.store().capacity(), "create rejected: store full");
        return Err(ApiError(PersonStoreError::StoreFull));
    };

    metrics.created.inc();
    app.refresh_store_gauge();
    tracing::debug!(id = %created.id, "person created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_person(
    State(app): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Person>> {
    let patch: PersonPatch = serde_json::from_slice(&body).map_err(invalid_json)?;

    let updated = app.store().update(&id, patch).ok_or_else(|| not_found(&app))?;
    app.refresh_store_gauge();
    Ok(Json(updated))
}

pub async fn delete_person(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !app.store().delete(&id) {
        return Err(not_found(&app));
    }
    app.refresh_store_gauge();
    app.metrics().deleted.inc();
    tracing::debug!(%id, "person deleted");
    Ok(StatusCode::NO_CONTENT)
}
