use std::net::SocketAddr;

use serde::Deserialize;
use personstore_core::error::{PersonStoreError, Result};
use personstore_core::{NewPerson, MAX_RECORDS};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub list: ListSection,

    #[serde(default)]
    pub sampler: SamplerSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            store: StoreSection::default(),
            list: ListSection::default(),
            sampler: SamplerSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PersonStoreError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.store.validate()?;
        self.list.validate()?;
        self.sampler.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Largest accepted POST /person body. Larger bodies get 413 and are not
    /// observed by the payload size histogram.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if !(1024..=64 * 1024 * 1024).contains(&self.max_body_bytes) {
            return Err(PersonStoreError::BadRequest(
                "server.max_body_bytes must be between 1024 and 67108864".into(),
            ));
        }
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            PersonStoreError::BadRequest("server.listen must be a valid SocketAddr".into())
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default = "default_max_records")]
    pub max_records: usize,

    /// Records inserted at startup.
    #[serde(default)]
    pub seed: Vec<NewPerson>,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
            seed: Vec::new(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_RECORDS).contains(&self.max_records) {
            return Err(PersonStoreError::BadRequest(format!(
                "store.max_records must be between 1 and {MAX_RECORDS}"
            )));
        }
        if self.seed.len() > self.max_records {
            return Err(PersonStoreError::BadRequest(
                "store.seed must not exceed store.max_records".into(),
            ));
        }
        for (i, p) in self.seed.iter().enumerate() {
            p.validate().map_err(|e| {
                PersonStoreError::BadRequest(format!("store.seed[{i}]: {e}"))
            })?;
        }
        Ok(())
    }
}

fn default_max_records() -> usize {
    MAX_RECORDS
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListSection {
    #[serde(default = "default_count")]
    pub default_count: usize,

    #[serde(default = "default_max_count")]
    pub max_count: usize,
}

impl Default for ListSection {
    fn default() -> Self {
        Self {
            default_count: default_count(),
            max_count: default_max_count(),
        }
    }
}

impl ListSection {
    pub fn validate(&self) -> Result<()> {
        if self.default_count == 0 || self.default_count > self.max_count {
            return Err(PersonStoreError::BadRequest(
                "list.default_count must be between 1 and list.max_count".into(),
            ));
        }
        Ok(())
    }
}

fn default_count() -> usize {
    20
}
fn default_max_count() -> usize {
    100
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplerSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for SamplerSection {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl SamplerSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=600000).contains(&self.interval_ms) {
            return Err(PersonStoreError::BadRequest(
                "sampler.interval_ms must be between 100 and 600000".into(),
            ));
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}
fn default_interval_ms() -> u64 {
    5000
}
