//! Prometheus text rendering of the metric registry.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use personstore_api::obs::metrics::{ApiMetrics, PAYLOAD_BUCKETS};

#[test]
fn fresh_registry_exposes_every_family() {
    let text = ApiMetrics::new().render();
    for (name, kind) in [
        ("http_requests_total", "counter"),
        ("http_requests_in_progress", "gauge"),
        ("http_request_duration_seconds", "histogram"),
        ("person_store_count", "gauge"),
        ("person_created_total", "counter"),
        ("person_deleted_total", "counter"),
        ("person_not_found_total", "counter"),
        ("person_payload_size_bytes", "histogram"),
        ("app_cpu_usage_percent", "gauge"),
        ("app_memory_usage_megabytes", "gauge"),
    ] {
        assert!(text.contains(&format!("# TYPE {name} {kind}\n")), "{name}");
        assert!(text.contains(&format!("# HELP {name} ")), "{name}");
    }
    // unlabeled series are present from the start
    assert!(text.contains("person_created_total 0\n"));
    assert!(text.contains("person_payload_size_bytes_count 0\n"));
}

#[test]
fn payload_buckets_span_100b_to_50kb() {
    assert_eq!(PAYLOAD_BUCKETS.len(), 10);
    assert_eq!(PAYLOAD_BUCKETS[0], 100.0);
    for w in PAYLOAD_BUCKETS.windows(2) {
        assert_eq!(w[1], w[0] * 2.0);
    }
    assert_eq!(PAYLOAD_BUCKETS[9], 51_200.0);
}

#[test]
fn payload_histogram_is_cumulative() {
    let m = ApiMetrics::new();
    m.payload_size.observe(150.0);
    m.payload_size.observe(100_000.0);

    let text = m.render();
    assert!(text.contains("person_payload_size_bytes_bucket{le=\"100\"} 0\n"));
    assert!(text.contains("person_payload_size_bytes_bucket{le=\"200\"} 1\n"));
    assert!(text.contains("person_payload_size_bytes_bucket{le=\"51200\"} 1\n"));
    assert!(text.contains("person_payload_size_bytes_bucket{le=\"+Inf\"} 2\n"));
    assert!(text.contains("person_payload_size_bytes_sum 100150\n"));
    assert!(text.contains("person_payload_size_bytes_count 2\n"));
}

#[test]
fn labeled_series_render_sorted_labels() {
    let m = ApiMetrics::new();
    m.http_requests.inc(&[("method", "GET"), ("code", "404")]);
    m.http_in_progress.inc(&[("method", "PUT")]);
    m.http_duration.observe(&[("path", "/person/{id}"), ("method", "GET")], 0.02);

    let text = m.render();
    assert!(text.contains("http_requests_total{code=\"404\",method=\"GET\"} 1\n"));
    assert!(text.contains("http_requests_in_progress{method=\"PUT\"} 1\n"));
    assert!(text.contains(
        "http_request_duration_seconds_bucket{method=\"GET\",path=\"/person/{id}\",le=\"0.01\"} 0\n"
    ));
    assert!(text.contains(
        "http_request_duration_seconds_bucket{method=\"GET\",path=\"/person/{id}\",le=\"0.025\"} 1\n"
    ));
    assert!(text.contains("http_request_duration_seconds_count{method=\"GET\",path=\"/person/{id}\"} 1\n"));
}

#[test]
fn gauges_hold_floats() {
    let m = ApiMetrics::new();
    m.memory_mb.set(12.5);
    m.cpu_percent.set(3.25);
    m.store_count.set(7.0);

    let text = m.render();
    assert!(text.contains("app_memory_usage_megabytes 12.5\n"));
    assert!(text.contains("app_cpu_usage_percent 3.25\n"));
    assert!(text.contains("person_store_count 7\n"));
}

#[test]
fn label_values_are_escaped() {
    let m = ApiMetrics::new();
    m.http_requests.inc(&[("code", "200"), ("method", "GE\"T")]);
    assert!(m.render().contains("method=\"GE\\\"T\""));
}

#[test]
fn concurrent_updates_are_not_lost() {
    use std::sync::Arc;
    use std::thread;

    let m = Arc::new(ApiMetrics::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let m = Arc::clone(&m);
            thread::spawn(move || {
                for _ in 0..1000 {
                    m.created.inc();
                    m.http_requests.inc(&[("code", "201"), ("method", "POST")]);
                    m.payload_size.observe(1.0);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(m.created.get(), 8000);
    assert_eq!(m.http_requests.get(&[("code", "201"), ("method", "POST")]), 8000);
    assert_eq!(m.payload_size.count(), 8000);
    assert!(m.render().contains("person_payload_size_bytes_sum 8000\n"));
}
