//! Local Ollama discovery.
//!
//! Queries Ollama's `/api/tags` endpoint and turns whatever models are pulled
//! locally into a synthetic "Ollama (Local)" provider. No server running is
//! the common case, so every failure here is reported to the caller as a
//! [`ProbeError`] and never escalates further.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use super::error::ProbeError;
use super::heuristics;
use super::types::{Provider, ProviderType};
use crate::constants::{LOCAL_PROVIDER_ID, LOCAL_PROVIDER_NAME, OLLAMA_TAGS_PATH};

/// One entry of Ollama's tag listing. Only `name` drives behavior.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocalModel {
    pub name: String,
    #[serde(default)]
    pub modified_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub digest: String,
    #[serde(default)]
    pub details: RawLocalModelDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocalModelDetails {
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub families: Option<Vec<String>>,
    #[serde(default)]
    pub parameter_size: String,
    #[serde(default)]
    pub quantization_level: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<RawLocalModel>,
}

/// Probes a local Ollama server for installed models.
#[derive(Debug, Clone)]
pub struct LocalProber {
    base_url: String,
    timeout: Duration,
}

impl LocalProber {
    /// Creates a prober for the server at `base_url` (e.g. `http://localhost:11434`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Fetches the raw tag listing.
    ///
    /// # Errors
    ///
    /// [`ProbeError::Connect`] when the server is unreachable or the request
    /// times out, [`ProbeError::Http`] on a non-success status, and
    /// [`ProbeError::Decode`] on malformed JSON.
    pub async fn list_models(&self) -> Result<Vec<RawLocalModel>, ProbeError> {
        let url = format!("{}{}", self.base_url, OLLAMA_TAGS_PATH);
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProbeError::Client)?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|source| ProbeError::Connect {
                url: url.clone(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(ProbeError::Http(response.status()));
        }

        let tags: TagsResponse = response.json().await.map_err(ProbeError::Decode)?;
        Ok(tags.models)
    }

    /// Builds the local provider from the installed models.
    ///
    /// # Errors
    ///
    /// Propagates [`list_models`](Self::list_models) failures and returns
    /// [`ProbeError::NoModels`] when the server answers with an empty list.
    pub async fn build_provider(&self) -> Result<Provider, ProbeError> {
        let models: Vec<_> = self
            .list_models()
            .await?
            .iter()
            .map(heuristics::convert)
            .collect();
        let (large, small) =
            heuristics::pick_default_models(&models).ok_or(ProbeError::NoModels)?;

        Ok(Provider {
            id: LOCAL_PROVIDER_ID.to_string(),
            name: LOCAL_PROVIDER_NAME.to_string(),
            kind: ProviderType::OpenAI,
            api_endpoint: format!("{}/v1", self.base_url),
            api_key: String::new(),
            default_large_model_id: large,
            default_small_model_id: small,
            models,
        })
    }

    /// Best-effort variant of [`build_provider`](Self::build_provider) that
    /// logs and swallows every failure.
    pub async fn probe(&self) -> Option<Provider> {
        match self.build_provider().await {
            Ok(provider) => {
                tracing::info!(
                    model_count = provider.models.len(),
                    "adding Ollama provider"
                );
                Some(provider)
            }
            Err(err) => {
                tracing::debug!(error = %err, "Ollama provider not available");
                None
            }
        }
    }
}
