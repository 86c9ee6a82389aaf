//! The provider registry: one lazily computed provider list per registry.
//!
//! On the first [`ProviderRegistry::get`] the registry picks a source (fresh
//! cache, live catalog fetch, or stale cache as a last resort), appends the
//! locally probed Ollama provider when one answers, and persists the result.
//! The computation runs on a task the registry owns, so concurrent first
//! callers wait for it and a caller that stops waiting does not cancel it.
//! Every later call gets the same shared list, or the same error.
//!
//! When served from a fresh cache, a background task re-fetches the catalog
//! and rewrites the cache file for the next process. That refresh never
//! changes the list this registry already handed out.

#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OnceCell};
use tokio::task::JoinHandle;

use super::cache::CacheStore;
use super::client::CatalogClient;
use super::error::{CatalogError, RegistryError};
use super::local::LocalProber;
use super::types::Provider;
use crate::constants::CATALOG_FETCH_TIMEOUT_SECS;

/// Where the registry is in its one-time initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

type LoadResult = Result<Vec<Provider>, RegistryError>;

/// Everything the load algorithm reads from. Shared with the load and refresh tasks.
struct Sources {
    client: Arc<dyn CatalogClient>,
    cache: CacheStore,
    prober: LocalProber,
    fetch_timeout: Duration,
    refresh: Mutex<Option<JoinHandle<()>>>,
}

impl Sources {
    /// Fetches from the catalog, treating a timeout like any other failure.
    async fn fetch(&self) -> Result<Vec<Provider>, CatalogError> {
        match tokio::time::timeout(self.fetch_timeout, self.client.fetch_providers()).await {
            Ok(result) => result,
            Err(_) => Err(CatalogError::Timeout(self.fetch_timeout)),
        }
    }
}

/// Lazily initialized, shareable provider catalog.
pub struct ProviderRegistry {
    sources: Arc<Sources>,
    providers: OnceCell<Result<Arc<[Provider]>, RegistryError>>,
    started: AtomicBool,
    load_task: AsyncMutex<Option<JoinHandle<LoadResult>>>,
}

impl ProviderRegistry {
    /// Creates a registry over the given catalog client, cache, and local prober.
    ///
    /// Nothing is fetched or read until the first [`get`](Self::get).
    pub fn new(client: Arc<dyn CatalogClient>, cache: CacheStore, prober: LocalProber) -> Self {
        Self {
            sources: Arc::new(Sources {
                client,
                cache,
                prober,
                fetch_timeout: Duration::from_secs(CATALOG_FETCH_TIMEOUT_SECS),
                refresh: Mutex::new(None),
            }),
            providers: OnceCell::new(),
            started: AtomicBool::new(false),
            load_task: AsyncMutex::new(None),
        }
    }

    /// Bounds every live catalog fetch, including the background refresh.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        if let Some(sources) = Arc::get_mut(&mut self.sources) {
            sources.fetch_timeout = timeout;
        }
        self
    }

    pub fn cache(&self) -> &CacheStore {
        &self.sources.cache
    }

    pub fn state(&self) -> RegistryState {
        match self.providers.get() {
            Some(Ok(_)) => RegistryState::Ready,
            Some(Err(_)) => RegistryState::Failed,
            None if self.started.load(Ordering::Acquire) => RegistryState::Initializing,
            None => RegistryState::Uninitialized,
        }
    }

    /// Returns the provider list, computing it on the first call.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unavailable`] when neither the cache nor the
    /// catalog produced a provider. The failure is final for this registry:
    /// later calls return the same error without retrying.
    ///
    /// Dropping the returned future only stops this caller from waiting; the
    /// load keeps running and the next caller picks up its result.
    pub async fn get(&self) -> Result<Arc<[Provider]>, RegistryError> {
        self.providers
            .get_or_init(|| async {
                self.started.store(true, Ordering::Release);
                let mut slot = self.load_task.lock().await;
                let task = slot
                    .get_or_insert_with(|| tokio::spawn(Arc::clone(&self.sources).load()));
                let loaded = match task.await {
                    Ok(loaded) => loaded,
                    Err(err) => Err(RegistryError::Unavailable {
                        reason: format!("provider load task failed: {err}"),
                    }),
                };
                slot.take();
                loaded.map(Arc::<[Provider]>::from)
            })
            .await
            .clone()
    }

    /// Waits for the background cache refresh, if one was started.
    pub async fn wait_for_refresh(&self) {
        let handle = self.take_refresh();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                if !err.is_cancelled() {
                    tracing::warn!(error = %err, "provider cache refresh task failed");
                }
            }
        }
    }

    /// Aborts the background cache refresh, if one is running.
    pub fn cancel_refresh(&self) {
        if let Some(handle) = self.take_refresh() {
            handle.abort();
        }
    }

    fn take_refresh(&self) -> Option<JoinHandle<()>> {
        self.sources
            .refresh
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

impl Drop for ProviderRegistry {
    fn drop(&mut self) {
        if let Some(task) = self.load_task.get_mut().take() {
            task.abort();
        }
        self.cancel_refresh();
    }
}

impl Sources {
    async fn load(self: Arc<Self>) -> LoadResult {
        let cache = &self.cache;
        let status = cache.is_stale();

        if status.exists && !status.stale {
            tracing::info!(path = %cache.path().display(), "using cached provider data");
            match cache.load() {
                Ok(cached) if !cached.is_empty() => {
                    self.spawn_refresh();
                    let local = self.prober.probe().await;
                    return Ok(append_local(cached, local));
                }
                Ok(_) => tracing::warn!("provider cache is empty"),
                Err(err) => tracing::warn!(error = %err, "failed to load provider cache"),
            }
        }

        tracing::info!("getting live provider data");
        let fetched = self.fetch().await;
        let local = self.prober.probe().await;
        let fetch_failure = match fetched {
            Ok(fetched) => {
                let providers = append_local(fetched, local.clone());
                if !providers.is_empty() {
                    if let Err(err) = cache.save(&providers) {
                        tracing::warn!(error = %err, "failed to save provider cache");
                    }
                    return Ok(providers);
                }
                "provider catalog returned no providers".to_string()
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch provider catalog");
                err.to_string()
            }
        };

        if !status.exists {
            return Err(RegistryError::Unavailable {
                reason: format!("{fetch_failure} and no provider cache exists"),
            });
        }

        tracing::info!(path = %cache.path().display(), "falling back to cached provider data");
        let cached = cache.load().map_err(|err| RegistryError::Unavailable {
            reason: format!("{fetch_failure}; {err}"),
        })?;
        let providers = append_local(cached, local);
        if providers.is_empty() {
            return Err(RegistryError::Unavailable {
                reason: format!("{fetch_failure} and the provider cache is empty"),
            });
        }
        Ok(providers)
    }

    fn spawn_refresh(self: &Arc<Self>) {
        let handle = tokio::spawn(refresh_cache(Arc::clone(self)));
        let previous = self
            .refresh
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

/// Re-fetches the catalog and overwrites the cache file.
async fn refresh_cache(sources: Arc<Sources>) {
    tracing::info!("updating provider cache in background");
    match sources.fetch().await {
        Ok(fetched) if !fetched.is_empty() => {
            let local = sources.prober.probe().await;
            let providers = append_local(fetched, local);
            if let Err(err) = sources.cache.save(&providers) {
                tracing::warn!(error = %err, "failed to save refreshed provider cache");
            }
        }
        Ok(_) => tracing::debug!("provider catalog returned no providers, keeping cache"),
        Err(err) => tracing::warn!(error = %err, "background provider refresh failed"),
    }
}

/// Appends the local provider after every other provider.
///
/// Any entry already using the local provider's ID (typically persisted by an
/// earlier run) is dropped first, so the local provider appears at most once
/// and only while the server answers.
fn append_local(mut providers: Vec<Provider>, local: Option<Provider>) -> Vec<Provider> {
    providers.retain(|p| !p.is_local());
    providers.extend(local);
    providers
}
