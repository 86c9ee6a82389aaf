//! Provider catalog for kaze.
//!
//! Serves the list of model providers from an on-disk cache or the remote
//! catalog service, augmented with whatever a local Ollama server offers.
//! [`ProviderRegistry`] is the entry point; the other modules are its parts.

mod cache;
mod client;
mod error;
pub mod heuristics;
mod local;
mod registry;
mod types;

pub use cache::{CacheStatus, CacheStore, Clock, SystemClock};
pub use client::{CatalogClient, HttpCatalogClient};
pub use error::{CacheError, CatalogError, ProbeError, RegistryError};
pub use local::{LocalProber, RawLocalModel, RawLocalModelDetails};
pub use registry::{ProviderRegistry, RegistryState};
pub use types::{Model, Provider, ProviderType};

#[cfg(test)]
pub(crate) use types::sample_provider;

use std::sync::Arc;

use crate::config::Settings;

impl ProviderRegistry {
    /// Builds a registry wired to the HTTP catalog, the configured cache file,
    /// and the configured Ollama server.
    pub fn from_settings(settings: &Settings) -> Self {
        let client = HttpCatalogClient::new(&settings.catalog_url, settings.fetch_timeout);
        let cache = CacheStore::new(&settings.cache_path, settings.stale_after);
        let prober = LocalProber::new(&settings.ollama_base_url, settings.probe_timeout);
        Self::new(Arc::new(client), cache, prober).with_fetch_timeout(settings.fetch_timeout)
    }
}
