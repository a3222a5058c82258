use crate::error::{BackendError, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Prefix shared by every backend environment variable
pub const ENV_PREFIX: &str = "CINESENSE_";

/// Backend configuration loaded from `CINESENSE_*` environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BackendConfig {
    /// Snapshot file the store writes through to (`CINESENSE_STORE_PATH`)
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Delay awaited before every backend call (`CINESENSE_LATENCY_MS`)
    #[serde(default)]
    pub latency_ms: u64,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/cinesense.json")
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            latency_ms: 0,
        }
    }
}

impl BackendConfig {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, BackendConfig>(vars)
            .map_err(|e| BackendError::Config(format!("Failed to load config: {}", e)))
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}
