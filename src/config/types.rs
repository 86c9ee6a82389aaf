//! Struct definitions for the catalog section of kaze's configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration, deserialized from `config.toml`.
///
/// Every field is optional so the catalog runs with defaults when no config
/// file exists. Sections kaze uses for other purposes are ignored.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Remote catalog and cache settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// `[catalog]` section.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Base URL of the provider catalog service.
    pub url: Option<String>,
    /// Hours after which the provider cache is refetched.
    pub stale_after_hours: Option<u64>,
    /// Upper bound on a live catalog fetch, in seconds.
    pub fetch_timeout_secs: Option<u64>,
}

/// `[provider]` section. Only the local Ollama server matters to the catalog.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    /// Configuration for the local Ollama provider.
    pub ollama: Option<OllamaEntry>,
}

/// Connection details for the local Ollama server.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OllamaEntry {
    /// Base URL of the Ollama API (e.g. `http://localhost:11434`).
    pub base_url: Option<String>,
    /// Upper bound on the `/api/tags` probe, in seconds.
    pub probe_timeout_secs: Option<u64>,
}

/// Fully resolved settings: config file, environment, and defaults combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog_url: String,
    pub cache_path: PathBuf,
    pub stale_after: Duration,
    pub fetch_timeout: Duration,
    pub ollama_base_url: String,
    pub probe_timeout: Duration,
}
