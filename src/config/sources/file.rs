//! TOML file sources.

use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::Path;

/// Add a TOML file. A missing optional file is skipped; a missing required
/// file fails the build.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        File::from(path.to_path_buf())
            .format(FileFormat::Toml)
            .required(required),
    )
}
