//! Configuration
//!
//! Layered with the `config` crate. Precedence, lowest first: built-in
//! defaults, the global file `<config_dir>/treeshell/config.toml`, an explicit
//! `--config` file, then `TREESHELL__*` environment variables (`__` separates
//! nested keys, e.g. `TREESHELL__LOGGING__LEVEL=debug`).

pub mod facade;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::ShellError;
use crate::logging::LoggingConfig;
use crate::recycle::ReaperConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Seconds a soft-deleted node stays restorable.
    pub retention_secs: u32,

    /// Milliseconds between reaper sweeps.
    pub reap_interval_ms: u64,

    /// Colored prompt and tables.
    pub color: bool,

    pub logging: LoggingConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            retention_secs: 120,
            reap_interval_ms: 1000,
            color: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl ShellConfig {
    pub fn validate(&self) -> Result<(), ShellError> {
        if self.retention_secs == 0 {
            return Err(ShellError::config("retention_secs must be greater than zero"));
        }
        if self.reap_interval_ms == 0 {
            return Err(ShellError::config("reap_interval_ms must be greater than zero"));
        }
        self.logging.validate()
    }

    pub fn reaper_config(&self) -> ReaperConfig {
        ReaperConfig {
            retention: chrono::Duration::seconds(i64::from(self.retention_secs)),
            poll_interval: Duration::from_millis(self.reap_interval_ms),
        }
    }

    /// Effective configuration as TOML, for `treeshell config`.
    pub fn to_toml(&self) -> Result<String, ShellError> {
        toml::to_string_pretty(self)
            .map_err(|e| ShellError::config(format!("Failed to serialize config: {}", e)))
    }
}
