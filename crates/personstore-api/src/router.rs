//! Axum router wiring.
//!
//! The five person operations are each wrapped by the instrumentation
//! middleware with their route template; `/metrics` and `/health` are not.
//! Instrumentation is a route layer, so requests that only hit a 405
//! fallback are not counted.

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::api::handlers;
use crate::api::instrument::{track, RouteTag};
use crate::{app_state::AppState, ops};

/// Route templates used as the `path` metric label.
pub const ROUTE_LIST: &str = "/person/list";
pub const ROUTE_CREATE: &str = "/person";
pub const ROUTE_ITEM: &str = "/person/{id}";

pub fn build_router(state: AppState) -> Router {
    let list = RouteTag::new(&state, ROUTE_LIST);
    let create = RouteTag::new(&state, ROUTE_CREATE);
    let item = RouteTag::new(&state, ROUTE_ITEM);
    let body_limit = DefaultBodyLimit::max(state.cfg().server.max_body_bytes);

    Router::new()
        .route(
            "/person/list",
            get(handlers::list_persons).route_layer(from_fn_with_state(list, track)),
        )
        .route(
            "/person",
            post(handlers::create_person)
                .layer(body_limit)
                .route_layer(from_fn_with_state(create, track)),
        )
        .route(
            "/person/:id",
            get(handlers::get_person)
                .put(handlers::update_person)
                .delete(handlers::delete_person)
                .route_layer(from_fn_with_state(item, track)),
        )
        .route("/metrics", get(ops::metrics))
        .route("/health", get(ops::health))
        .with_state(state)
}
