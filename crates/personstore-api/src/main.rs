//! personstore API server.
//!
//! - Person CRUD under /person
//! - Prometheus metrics at /metrics, liveness at /health
//! - Background process sampler, stopped on shutdown

use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use personstore_api::{app_state, config, obs, router};
use personstore_core::error::{PersonStoreError, Result};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var("PERSONSTORE_CONFIG")
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_or_default(&path)?;
    let listen = cfg.server.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;

    let cancel = CancellationToken::new();
    let sampler_cfg = &state.cfg().sampler;
    let sampler = sampler_cfg.enabled.then(|| {
        obs::sampler::spawn(
            state.metrics(),
            Duration::from_millis(sampler_cfg.interval_ms),
            cancel.clone(),
        )
    });

    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| PersonStoreError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, "personstore-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PersonStoreError::Internal(format!("server failed: {e}")))?;

    match sampler {
        Some(handle) => obs::sampler::shutdown(&cancel, handle).await,
        None => cancel.cancel(),
    }
    tracing::info!("personstore-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl_c listener failed");
        return;
    }
    tracing::info!("shutdown requested");
}
