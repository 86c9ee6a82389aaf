//! File loading for kaze configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::Config;

impl Config {
    /// Loads the global config from `~/.config/kaze/config.toml`.
    pub(super) fn load_global() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads config from `path`, returning defaults when the file does not exist.
    ///
    /// The catalog only reads configuration; it never creates the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        Ok(config)
    }
}
