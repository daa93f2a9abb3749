//! ConfigLoader facade: composes the sources and deserializes a ShellConfig.

use super::sources::{environment, file};
use super::{paths, ShellConfig};
use crate::error::ShellError;
use config::Config;
use std::path::PathBuf;
use tracing::debug;

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    global_file: Option<PathBuf>,
    explicit_file: Option<PathBuf>,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            global_file: paths::global_config_file(),
            explicit_file: None,
            env_prefix: Some(environment::ENV_PREFIX.to_string()),
        }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer a file that must exist above the global one.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Replace (or with `None`, skip) the global config file.
    pub fn with_global_file(mut self, path: Option<PathBuf>) -> Self {
        self.global_file = path;
        self
    }

    /// Read overrides from `<prefix>__*` instead of `TREESHELL__*`; `None` skips them.
    pub fn with_env_prefix(mut self, prefix: Option<&str>) -> Self {
        self.env_prefix = prefix.map(str::to_string);
        self
    }

    /// Merge every layer, deserialize, and validate.
    pub fn load(&self) -> Result<ShellConfig, ShellError> {
        let mut builder = Config::builder();
        if let Some(global) = &self.global_file {
            builder = file::add_to_builder(builder, global, false);
        }
        if let Some(explicit) = &self.explicit_file {
            if !explicit.exists() {
                return Err(ShellError::config(format!(
                    "Config file not found: {}",
                    explicit.display()
                )));
            }
            builder = file::add_to_builder(builder, explicit, true);
        }
        if let Some(prefix) = &self.env_prefix {
            builder = environment::add_to_builder(builder, prefix);
        }

        let config: ShellConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(
            retention_secs = config.retention_secs,
            reap_interval_ms = config.reap_interval_ms,
            "Loaded configuration"
        );
        Ok(config)
    }
}
