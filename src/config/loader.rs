// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::config::validate::field_diagnostics;
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] for
/// the structural checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// - Reads TOML.
/// - Rejects empty or duplicate installation and node names.
/// - Logs the advisory field findings (empty / too short values) as
///   warnings; these never fail the load.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;

    for diag in field_diagnostics(&config) {
        warn!(field = %diag.field, finding = %diag.validation, "suspicious configuration value");
    }

    Ok(config)
}

/// Default config location: `Publishers.toml` in the current working
/// directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Publishers.toml")
}
