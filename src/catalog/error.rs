//! Error types for each catalog component.
//!
//! Only [`RegistryError`] ever reaches callers of
//! [`ProviderRegistry::get`](super::ProviderRegistry::get); the others are
//! absorbed by the fallback chain and logged.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures reading or writing the provider cache file.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read provider cache {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode provider cache {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode provider list")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write provider cache {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures probing the local Ollama server.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client for Ollama")]
    Client(#[source] reqwest::Error),
    #[error("failed to connect to Ollama at {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Ollama API returned status {0}")]
    Http(StatusCode),
    #[error("failed to decode Ollama response")]
    Decode(#[source] reqwest::Error),
    #[error("no models found in local Ollama installation")]
    NoModels,
}

/// Failures fetching the provider list from the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to build HTTP client for the provider catalog")]
    Client(#[source] reqwest::Error),
    #[error("failed to reach provider catalog at {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider catalog returned status {0}")]
    Http(StatusCode),
    #[error("failed to decode provider catalog response")]
    Decode(#[source] reqwest::Error),
    #[error("provider catalog fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Terminal outcome of a registry whose every data source came up empty.
///
/// `Clone` so the single failed initialization can be handed to every caller.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("failed to load providers: {reason}")]
    Unavailable { reason: String },
}
