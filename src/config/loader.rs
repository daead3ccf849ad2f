// src/config/loader.rs

use std::path::{Path, PathBuf};

use crate::config::model::{PipelineConfig, RawConfigFile};
use crate::errors::{PipelineError, Result};
use crate::fs::FileSystem;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs
        .read_to_string(path)
        .map_err(|e| PipelineError::ConfigError(format!("reading {}: {e}", path.display())))?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks that paths and the raster table are non-empty for the stages
///   that will actually run.
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<PipelineConfig> {
    let raw_config = load_from_path(fs, &path)?;
    let config = PipelineConfig::try_from(raw_config)?;
    Ok(config)
}

/// Helper to resolve a default config path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Mintpipe.toml")
}
