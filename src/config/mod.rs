//! Configuration for the kaze provider catalog.
//!
//! Settings come from the global TOML config (`~/.config/kaze/config.toml`),
//! `{env:VAR}` substitutions inside it, and environment overrides. The
//! provider cache lives under the XDG data directory (`~/.local/share/kaze/`).

mod loader;
mod paths;
mod resolve;
mod types;

pub use types::{CatalogConfig, Config, OllamaEntry, ProviderConfig, Settings};

use anyhow::Result;

/// Reads a variable from the process environment.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl Config {
    /// Load the global config and resolve `{env:VAR}` substitutions.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_global()?;
        config.resolve_substitutions(&env_lookup);
        Ok(config)
    }
}

impl Settings {
    /// Loads the config file and applies environment overrides.
    pub fn load() -> Result<Self> {
        Config::load()?.settings_with(&env_lookup)
    }
}
