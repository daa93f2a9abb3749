//! Platform directories for the global config file and the default log file.

use crate::error::ShellError;
use directories::ProjectDirs;
use std::path::PathBuf;

const APPLICATION: &str = "treeshell";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APPLICATION)
}

/// `<config_dir>/treeshell/config.toml`, if a home directory is known.
pub fn global_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default log file in the platform state directory.
///
/// Platforms without a state directory fall back to the local data directory.
pub fn default_log_file() -> Result<PathBuf, ShellError> {
    let dirs = project_dirs().ok_or_else(|| {
        ShellError::config("Could not determine platform directories for the log file")
    })?;
    let dir = dirs
        .state_dir()
        .unwrap_or_else(|| dirs.data_local_dir())
        .to_path_buf();
    Ok(dir.join("treeshell.log"))
}
