//! Observability: metric registry and the background process sampler.
//!
//! Metrics are stored as atomics keyed by label set and rendered in the
//! Prometheus text exposition format by the `/metrics` handler.

pub mod metrics;
pub mod sampler;
