//! Metrics registry for the person API.
//!
//! Counter/gauge/histogram types with dynamic labels backed by `DashMap`.
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering. Float values (gauges, histogram sums) are stored as `f64` bits in
//! an `AtomicU64`, so no update ever takes a lock beyond the map shard.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Request latency buckets in seconds.
pub const DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Payload size buckets in bytes: 100 * 2^i for i in 0..10 (100B .. 51.2KB).
pub const PAYLOAD_BUCKETS: &[f64] = &[
    100.0, 200.0, 400.0, 800.0, 1_600.0, 3_200.0, 6_400.0, 12_800.0, 25_600.0, 51_200.0,
];

type LabelKey = Vec<(String, String)>;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_pairs(key: &[(String, String)]) -> Vec<String> {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect()
}

/// `{a="b",c="d"}`, or nothing for an empty label set.
fn braces(pairs: &[String]) -> String {
    if pairs.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", pairs.join(","))
    }
}

fn header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
}

fn load_f64(cell: &AtomicU64) -> f64 {
    f64::from_bits(cell.load(Ordering::Relaxed))
}

fn add_f64(cell: &AtomicU64, v: f64) {
    let _ = cell.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
        Some((f64::from_bits(bits) + v).to_bits())
    });
}

/// Unlabeled monotonic counter.
#[derive(Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "counter");
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

/// Unlabeled point-in-time gauge holding an `f64`.
#[derive(Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn set(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        load_f64(&self.0)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "gauge");
        let _ = writeln!(out, "{} {}", name, self.get());
    }
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for a label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "counter");
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{} {}", name, braces(&label_pairs(r.key())), val);
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<LabelKey, AtomicI64>,
}

impl GaugeVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) { self.add(labels, 1); }
    /// Decrement by 1.
    pub fn dec(&self, labels: &[(&str, &str)]) { self.add(labels, -1); }

    /// Add an arbitrary signed delta.
    pub fn add(&self, labels: &[(&str, &str)], v: i64) {
        let gauge = self.map.entry(label_key(labels)).or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> i64 {
        self.map
            .get(&label_key(labels))
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "gauge");
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{} {}", name, braces(&label_pairs(r.key())), val);
        }
    }
}

struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: Vec<AtomicU64>,
}

impl AtomicHistogram {
    fn new(bounds: &[f64]) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0f64.to_bits()),
            buckets: bounds.iter().map(|_| AtomicU64::new(0)).collect(),
        }
    }

    fn observe(&self, bounds: &[f64], v: f64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        add_f64(&self.sum, v);

        // Cumulative buckets: increment every bucket whose bound covers the value.
        for (bucket, &le) in self.buckets.iter().zip(bounds) {
            if v <= le {
                bucket.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn render(&self, name: &str, bounds: &[f64], pairs: &[String], out: &mut String) {
        for (bucket, &le) in self.buckets.iter().zip(bounds) {
            let count = bucket.load(Ordering::Relaxed);
            let mut with_le = pairs.to_vec();
            with_le.push(format!("le=\"{}\"", le));
            let _ = writeln!(out, "{}_bucket{} {}", name, braces(&with_le), count);
        }
        let count = self.count.load(Ordering::Relaxed);
        let mut with_inf = pairs.to_vec();
        with_inf.push("le=\"+Inf\"".to_string());
        let _ = writeln!(out, "{}_bucket{} {}", name, braces(&with_inf), count);

        let _ = writeln!(out, "{}_sum{} {}", name, braces(pairs), load_f64(&self.sum));
        let _ = writeln!(out, "{}_count{} {}", name, braces(pairs), count);
    }
}

/// Unlabeled histogram with fixed bucket bounds.
pub struct Histogram {
    bounds: &'static [f64],
    inner: AtomicHistogram,
}

impl Histogram {
    pub fn new(bounds: &'static [f64]) -> Self {
        Self { bounds, inner: AtomicHistogram::new(bounds) }
    }

    pub fn observe(&self, v: f64) {
        self.inner.observe(self.bounds, v);
    }

    pub fn count(&self) -> u64 {
        self.inner.count.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "histogram");
        self.inner.render(name, self.bounds, &[], out);
    }
}

pub struct HistogramVec {
    bounds: &'static [f64],
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    pub fn new(bounds: &'static [f64]) -> Self {
        Self { bounds, map: DashMap::new() }
    }

    /// Observe a value and increment cumulative buckets.
    pub fn observe(&self, labels: &[(&str, &str)], v: f64) {
        let bounds = self.bounds;
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicHistogram::new(bounds));
        hist.observe(bounds, v);
    }

    /// Number of observations for a label set.
    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "histogram");
        for r in self.map.iter() {
            r.value().render(name, self.bounds, &label_pairs(r.key()), out);
        }
    }
}

/// Every metric the service exports. Names and label sets are part of the
/// public contract and must not change.
pub struct ApiMetrics {
    /// `code`, `method`
    pub http_requests: CounterVec,
    /// `method`
    pub http_in_progress: GaugeVec,
    /// `method`, `path`; seconds
    pub http_duration: HistogramVec,
    pub store_count: Gauge,
    pub created: Counter,
    pub deleted: Counter,
    pub not_found: Counter,
    /// Raw POST /person body size in bytes.
    pub payload_size: Histogram,
    pub cpu_percent: Gauge,
    pub memory_mb: Gauge,
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self {
            http_requests: CounterVec::default(),
            http_in_progress: GaugeVec::default(),
            http_duration: HistogramVec::new(DURATION_BUCKETS),
            store_count: Gauge::default(),
            created: Counter::default(),
            deleted: Counter::default(),
            not_found: Counter::default(),
            payload_size: Histogram::new(PAYLOAD_BUCKETS),
            cpu_percent: Gauge::default(),
            memory_mb: Gauge::default(),
        }
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.http_requests.render(
            "http_requests_total",
            "Total number of HTTP requests processed, labeled by status code and method.",
            &mut out,
        );
        self.http_in_progress.render(
            "http_requests_in_progress",
            "Number of HTTP requests currently being processed.",
            &mut out,
        );
        self.http_duration.render(
            "http_request_duration_seconds",
            "Histogram of HTTP request durations in seconds.",
            &mut out,
        );
        self.store_count.render(
            "person_store_count",
            "Number of person records currently stored in memory.",
            &mut out,
        );
        self.created.render(
            "person_created_total",
            "Total number of persons created successfully.",
            &mut out,
        );
        self.deleted.render(
            "person_deleted_total",
            "Total number of persons deleted successfully.",
            &mut out,
        );
        self.not_found.render(
            "person_not_found_total",
            "Total number of operations attempted on nonexistent persons.",
            &mut out,
        );
        self.payload_size.render(
            "person_payload_size_bytes",
            "Size of JSON payloads in POST /person.",
            &mut out,
        );
        self.cpu_percent.render(
            "app_cpu_usage_percent",
            "CPU usage of the process (percent).",
            &mut out,
        );
        self.memory_mb.render(
            "app_memory_usage_megabytes",
            "Memory usage of the process (MB).",
            &mut out,
        );
        out
    }
}
