//! Per-route request instrumentation.
//!
//! Wraps a route so every request bumps `http_requests_in_progress{method}` on
//! entry and, on exit, observes `http_request_duration_seconds{method,path}`
//! and counts `http_requests_total{code,method}`. `path` is the route
//! template, never the concrete URI.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tokio::time::Instant;

use crate::app_state::AppState;
use crate::obs::metrics::ApiMetrics;

/// Middleware state: the registry plus the route template label.
#[derive(Clone)]
pub struct RouteTag {
    metrics: Arc<ApiMetrics>,
    route: &'static str,
}

impl RouteTag {
    pub fn new(state: &AppState, route: &'static str) -> Self {
        Self {
            metrics: state.metrics(),
            route,
        }
    }
}

/// Keeps the in-progress gauge balanced even if the request future is dropped.
struct InFlight<'a> {
    metrics: &'a ApiMetrics,
    method: &'a str,
}

impl<'a> InFlight<'a> {
    fn enter(metrics: &'a ApiMetrics, method: &'a str) -> Self {
        metrics.http_in_progress.inc(&[("method", method)]);
        Self { metrics, method }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.metrics.http_in_progress.dec(&[("method", self.method)]);
    }
}

pub async fn track(State(tag): State<RouteTag>, req: Request, next: Next) -> Response {
    let method = req.method().as_str().to_owned();
    let metrics = &*tag.metrics;
    let _in_flight = InFlight::enter(metrics, &method);
    let start = Instant::now();

    let resp = next.run(req).await;

    metrics.http_duration.observe(
        &[("method", &method), ("path", tag.route)],
        start.elapsed().as_secs_f64(),
    );
    metrics
        .http_requests
        .inc(&[("code", resp.status().as_str()), ("method", &method)]);
    resp
}
