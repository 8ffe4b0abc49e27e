//! Shared application state: config, the record store, and the metrics registry.

use std::sync::Arc;

use personstore_core::error::{PersonStoreError, Result};
use personstore_core::PersonStore;

use crate::config::AppConfig;
use crate::obs::metrics::ApiMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<ApiMetrics>,
}

struct AppStateInner {
    cfg: AppConfig,
    store: PersonStore,
}

impl AppState {
    /// Build application state and insert the configured seed records.
    pub fn new(cfg: AppConfig) -> Result<Self> {
        let store = PersonStore::new(cfg.store.max_records);
        for p in &cfg.store.seed {
            let seeded = store
                .try_create(p.clone())
                .ok_or(PersonStoreError::StoreFull)?;
            tracing::info!(id = %seeded.id, "seeded person");
        }

        let metrics = Arc::new(ApiMetrics::new());
        metrics.store_count.set(store.count() as f64);

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, store }),
            metrics,
        })
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> &PersonStore {
        &self.inner.store
    }

    pub fn metrics(&self) -> Arc<ApiMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Publish the current record count to `person_store_count`.
    pub fn refresh_store_gauge(&self) {
        self.metrics.store_count.set(self.inner.store.count() as f64);
    }
}
