//! Environment variable source: TREESHELL__* with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Prefix for configuration overrides.
pub const ENV_PREFIX: &str = "TREESHELL";

/// Add the environment overlay to `builder`.
///
/// `TREESHELL__RETENTION_SECS=30` sets `retention_secs`; nested keys use
/// another `__`, as in `TREESHELL__LOGGING__OUTPUT=stderr`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    prefix: &str,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(prefix)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
