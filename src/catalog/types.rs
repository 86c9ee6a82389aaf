//! Provider and model records shared by the catalog service, the cache file,
//! and the local Ollama probe.
//!
//! Field names follow the catalog service's JSON schema so a fetched list can
//! be written to the cache and read back without translation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire protocol family a provider speaks.
///
/// Unknown values from a newer catalog are kept verbatim in [`ProviderType::Other`]
/// instead of failing the whole decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderType {
    /// OpenAI-compatible chat completions API.
    OpenAI,
    Anthropic,
    Gemini,
    Azure,
    Bedrock,
    VertexAI,
    Xai,
    OpenRouter,
    /// Any protocol this build does not know about.
    Other(String),
}

impl ProviderType {
    /// Returns the wire name of this provider type (e.g. `"openai"`).
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Azure => "azure",
            Self::Bedrock => "bedrock",
            Self::VertexAI => "vertexai",
            Self::Xai => "xai",
            Self::OpenRouter => "openrouter",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for ProviderType {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "openai" => Self::OpenAI,
            "anthropic" => Self::Anthropic,
            "gemini" => Self::Gemini,
            "azure" => Self::Azure,
            "bedrock" => Self::Bedrock,
            "vertexai" => Self::VertexAI,
            "xai" => Self::Xai,
            "openrouter" => Self::OpenRouter,
            _ => Self::Other(value),
        }
    }
}

impl From<ProviderType> for String {
    fn from(value: ProviderType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single model offered by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Identifier sent to the provider's API (e.g. `"gpt-4o"`, `"codellama:7b"`).
    pub id: String,
    /// Human-friendly display name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cost_per_1m_in: f64,
    #[serde(default)]
    pub cost_per_1m_out: f64,
    #[serde(default)]
    pub cost_per_1m_in_cached: f64,
    #[serde(default)]
    pub cost_per_1m_out_cached: f64,
    /// Context window size in tokens.
    pub context_window: u64,
    /// Completion budget used when the caller does not pick one.
    pub default_max_tokens: u64,
    #[serde(default)]
    pub can_reason: bool,
    #[serde(default)]
    pub has_reasoning_efforts: bool,
    /// Whether the model accepts image attachments.
    #[serde(default)]
    pub supports_attachments: bool,
}

impl Model {
    /// Returns the display name, falling back to the ID when no name is set.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Returns `true` when every cost field is zero (e.g. local models).
    pub fn is_free(&self) -> bool {
        self.cost_per_1m_in == 0.0
            && self.cost_per_1m_out == 0.0
            && self.cost_per_1m_in_cached == 0.0
            && self.cost_per_1m_out_cached == 0.0
    }
}

/// A model provider: connection details plus the models it serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Stable identifier, unique across the catalog.
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProviderType,
    #[serde(default)]
    pub api_endpoint: String,
    /// API key or `$ENV_VAR` reference; empty for providers that need none.
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub default_large_model_id: String,
    #[serde(default)]
    pub default_small_model_id: String,
    #[serde(default)]
    pub models: Vec<Model>,
}

impl Provider {
    /// Looks up a model by its ID.
    pub fn model(&self, id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn default_large_model(&self) -> Option<&Model> {
        self.model(&self.default_large_model_id)
    }

    pub fn default_small_model(&self) -> Option<&Model> {
        self.model(&self.default_small_model_id)
    }

    /// Whether this is the dynamically probed local Ollama provider.
    pub fn is_local(&self) -> bool {
        self.id == crate::constants::LOCAL_PROVIDER_ID
    }
}

#[cfg(test)]
pub(crate) fn sample_provider(id: &str) -> Provider {
    Provider {
        id: id.to_string(),
        name: format!("{id} provider"),
        kind: ProviderType::OpenAI,
        api_endpoint: format!("https://api.{id}.example/v1"),
        api_key: format!("${}_API_KEY", id.to_uppercase()),
        default_large_model_id: format!("{id}-large"),
        default_small_model_id: format!("{id}-small"),
        models: vec![
            Model {
                id: format!("{id}-large"),
                name: format!("{id} Large"),
                cost_per_1m_in: 3.0,
                cost_per_1m_out: 15.0,
                cost_per_1m_in_cached: 3.75,
                cost_per_1m_out_cached: 0.3,
                context_window: 200_000,
                default_max_tokens: 50_000,
                can_reason: true,
                has_reasoning_efforts: false,
                supports_attachments: true,
            },
            Model {
                id: format!("{id}-small"),
                name: String::new(),
                cost_per_1m_in: 0.8,
                cost_per_1m_out: 4.0,
                cost_per_1m_in_cached: 1.0,
                cost_per_1m_out_cached: 0.08,
                context_window: 200_000,
                default_max_tokens: 5_000,
                can_reason: false,
                has_reasoning_efforts: false,
                supports_attachments: false,
            },
        ],
    }
}
