//! Remote provider catalog client.
//!
//! [`CatalogClient`] is the seam the registry fetches through; [`HttpCatalogClient`]
//! talks to the catalog service over HTTP.

use std::time::Duration;

use super::error::CatalogError;
use super::types::Provider;

/// Fetches the canonical provider list.
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Returns the current provider list in catalog order.
    async fn fetch_providers(&self) -> Result<Vec<Provider>, CatalogError>;
}

/// [`CatalogClient`] for the catalog service's `GET /providers` endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    base_url: String,
    timeout: Duration,
}

impl HttpCatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_providers(&self) -> Result<Vec<Provider>, CatalogError> {
        let url = format!("{}/providers", self.base_url);
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(CatalogError::Client)?;

        tracing::debug!(url = %url, "fetching provider catalog");
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|source| CatalogError::Connect {
                url: url.clone(),
                source,
            })?;
        if !response.status().is_success() {
            return Err(CatalogError::Http(response.status()));
        }

        response.json().await.map_err(CatalogError::Decode)
    }
}
