//! Environment variable substitution and settings resolution.

use anyhow::Result;
use std::time::Duration;

use super::types::{Config, Settings};
use crate::constants::{
    CACHE_STALE_AFTER_HOURS, CATALOG_FETCH_TIMEOUT_SECS, CATALOG_URL_ENV, DEFAULT_CATALOG_URL,
    OLLAMA_DEFAULT_BASE_URL, OLLAMA_PROBE_TIMEOUT_SECS,
};

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        if let Some(ref mut url) = self.catalog.url {
            *url = Self::resolve_str(url, lookup);
        }
        if let Some(ref mut ollama) = self.provider.ollama {
            if let Some(ref mut url) = ollama.base_url {
                *url = Self::resolve_str(url, lookup);
            }
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    ///
    /// Substituted values are inserted verbatim and never rescanned.
    fn resolve_str(s: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
        let mut result = String::with_capacity(s.len());
        let mut rest = s;
        while let Some(start) = rest.find("{env:") {
            let Some(end) = rest[start..].find('}') else {
                break;
            };
            let var_name = &rest[start + 5..start + end];
            result.push_str(&rest[..start]);
            result.push_str(&lookup(var_name).unwrap_or_default());
            rest = &rest[start + end + 1..];
        }
        result.push_str(rest);
        result
    }

    /// Combines this config with environment overrides and defaults.
    ///
    /// Catalog URL precedence: `KAZE_CATALOG_URL`, then `[catalog] url`,
    /// then the public catalog.
    pub fn settings_with(&self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<Settings> {
        let catalog_url = lookup(CATALOG_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.catalog.url.clone().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());

        let ollama = self.provider.ollama.clone().unwrap_or_default();
        let ollama_base_url = ollama
            .base_url
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| OLLAMA_DEFAULT_BASE_URL.to_string());

        let stale_after_hours = self
            .catalog
            .stale_after_hours
            .unwrap_or(CACHE_STALE_AFTER_HOURS);

        Ok(Settings {
            catalog_url,
            cache_path: Self::provider_cache_path_with(lookup)?,
            stale_after: Duration::from_secs(stale_after_hours.saturating_mul(60 * 60)),
            fetch_timeout: Duration::from_secs(
                self.catalog
                    .fetch_timeout_secs
                    .unwrap_or(CATALOG_FETCH_TIMEOUT_SECS),
            ),
            ollama_base_url,
            probe_timeout: Duration::from_secs(
                ollama.probe_timeout_secs.unwrap_or(OLLAMA_PROBE_TIMEOUT_SECS),
            ),
        })
    }
}
