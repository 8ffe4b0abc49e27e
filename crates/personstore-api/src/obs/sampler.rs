//! Background process sampler.
//!
//! Every tick reads the current process's resident memory and CPU usage and
//! writes them into `app_memory_usage_megabytes` / `app_cpu_usage_percent`.
//! The loop stops as soon as its `CancellationToken` fires; once cancellation
//! is observed no further gauge writes happen.

use std::sync::Arc;

use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use personstore_core::error::{PersonStoreError, Result};

use crate::obs::metrics::ApiMetrics;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One reading of process resource usage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSample {
    pub rss_bytes: u64,
    /// Percent since the previous sample.
    pub cpu_percent: f64,
}

/// Source of process resource readings.
pub trait ProcessProbe: Send + 'static {
    /// `None` when the reading is unavailable for this tick.
    fn sample(&mut self) -> Option<ProcessSample>;
}

/// `sysinfo`-backed probe for the running process.
pub struct SysinfoProbe {
    system: System,
    pid: Pid,
}

impl SysinfoProbe {
    pub fn current() -> Result<Self> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| PersonStoreError::Internal(format!("resolve current pid failed: {e}")))?;

        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        if system.process(pid).is_none() {
            return Err(PersonStoreError::Internal(format!(
                "process handle unavailable (pid={pid})"
            )));
        }
        Ok(Self { system, pid })
    }
}

impl ProcessProbe for SysinfoProbe {
    fn sample(&mut self) -> Option<ProcessSample> {
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        let proc = self.system.process(self.pid)?;
        Some(ProcessSample {
            rss_bytes: proc.memory(),
            cpu_percent: f64::from(proc.cpu_usage()),
        })
    }
}

/// Spawn the sampler for the current process on the runtime.
pub fn spawn(metrics: Arc<ApiMetrics>, every: Duration, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(run(SysinfoProbe::current, metrics, every, cancel))
}

/// Open a probe with `connect` and sample on `every` until `cancel` fires.
///
/// A probe that cannot be opened is a degraded, non-fatal condition: it is
/// logged once and the sampler returns without touching any gauge.
pub async fn run<P, F>(connect: F, metrics: Arc<ApiMetrics>, every: Duration, cancel: CancellationToken)
where
    P: ProcessProbe,
    F: FnOnce() -> Result<P>,
{
    let mut probe = match connect() {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "process sampler disabled");
            return;
        }
    };

    let mut tick = tokio::time::interval_at(Instant::now() + every, every);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::debug!(interval_ms = every.as_millis() as u64, "process sampler started");
    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            _ = tick.tick() => {
                match probe.sample() {
                    Some(s) => record(&metrics, s),
                    None => tracing::debug!("process sample unavailable"),
                }
            }
        }
    }
    tracing::info!("process sampler stopped");
}

/// Cancel the sampler and wait for it to finish. A sampler task that panicked
/// is logged, not propagated.
pub async fn shutdown(cancel: &CancellationToken, handle: JoinHandle<()>) {
    cancel.cancel();
    if let Err(e) = handle.await {
        tracing::warn!(error = %e, "process sampler task failed");
    }
}

fn record(metrics: &ApiMetrics, s: ProcessSample) {
    metrics.memory_mb.set(s.rss_bytes as f64 / BYTES_PER_MB);
    metrics.cpu_percent.set(s.cpu_percent);
}
