//! Path resolution for kaze configuration and data directories.

use anyhow::Result;
use std::path::PathBuf;

use super::types::Config;
use crate::constants::{APP_NAME, CONFIG_FILENAME, DATA_DIR_ENV, PROVIDER_CACHE_FILENAME};

impl Config {
    /// Returns the platform-specific configuration directory for kaze.
    ///
    /// Returns `~/.config/kaze/` on Linux (`XDG_CONFIG_HOME/kaze`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform's config directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join(APP_NAME);
        Ok(dir)
    }

    /// Returns the full path to the kaze configuration file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILENAME))
    }

    /// Returns the data directory, consulting `lookup` for overrides.
    ///
    /// Precedence: `KAZE_DATA_DIR` (used as-is), then `XDG_DATA_HOME/kaze`
    /// on every platform, then the OS per-user local data directory
    /// (`~/.local/share/kaze` on Linux, `%LOCALAPPDATA%\kaze` on Windows).
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the platform's data
    /// directory cannot be determined.
    pub fn data_dir_with(lookup: &dyn Fn(&str) -> Option<String>) -> Result<PathBuf> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(dir) = non_empty(DATA_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(xdg) = non_empty("XDG_DATA_HOME") {
            return Ok(PathBuf::from(xdg).join(APP_NAME));
        }
        let dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
            .join(APP_NAME);
        Ok(dir)
    }

    /// Returns the path of the provider cache file inside the data directory.
    pub fn provider_cache_path_with(lookup: &dyn Fn(&str) -> Option<String>) -> Result<PathBuf> {
        Ok(Self::data_dir_with(lookup)?.join(PROVIDER_CACHE_FILENAME))
    }
}
