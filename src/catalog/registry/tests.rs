use super::*;
use crate::catalog::cache::Clock;
use crate::catalog::types::sample_provider;
use httpmock::prelude::*;
use reqwest::StatusCode;
use serde_json::json;
use std::path::Path;
use std::sync::atomic::AtomicUsize;
use std::time::SystemTime;
use tokio::sync::Notify;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Catalog client with a scripted reply and a call counter.
struct MockCatalog {
    reply: Option<Vec<Provider>>,
    calls: AtomicUsize,
    delay: Duration,
    gate: Option<Arc<Notify>>,
}

impl MockCatalog {
    fn ok(providers: Vec<Provider>) -> Self {
        Self {
            reply: Some(providers),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            gate: None,
        }
    }

    fn failing() -> Self {
        Self {
            reply: None,
            ..Self::ok(Vec::new())
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CatalogClient for MockCatalog {
    async fn fetch_providers(&self) -> Result<Vec<Provider>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply
            .clone()
            .ok_or(CatalogError::Http(StatusCode::BAD_GATEWAY))
    }
}

/// Clock that runs a fixed offset ahead of real time, making the cache look old.
struct AheadClock(Duration);

impl Clock for AheadClock {
    fn now(&self) -> SystemTime {
        SystemTime::now() + self.0
    }
}

fn unreachable_local() -> LocalProber {
    LocalProber::new("http://127.0.0.1:1", Duration::from_millis(200))
}

fn local_server() -> MockServer {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/tags");
        then.status(200).json_body(json!({
            "models": [
                { "name": "llama3:70b" },
                { "name": "mistral:7b" }
            ]
        }));
    });
    server
}

fn fresh_cache(path: &Path) -> CacheStore {
    CacheStore::new(path, DAY)
}

fn stale_cache(path: &Path) -> CacheStore {
    CacheStore::with_clock(path, DAY, Arc::new(AheadClock(DAY * 2)))
}

fn registry(client: &Arc<MockCatalog>, cache: CacheStore, prober: LocalProber) -> ProviderRegistry {
    let client: Arc<dyn CatalogClient> = client.clone();
    ProviderRegistry::new(client, cache, prober)
}

fn ids(providers: &[Provider]) -> Vec<&str> {
    providers.iter().map(|p| p.id.as_str()).collect()
}

#[tokio::test]
async fn test_fresh_cache_is_served_without_blocking_on_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    let cached = vec![sample_provider("acme"), sample_provider("globex")];
    fresh_cache(&path).save(&cached).unwrap();

    let gate = Arc::new(Notify::new());
    let client = Arc::new(MockCatalog {
        gate: Some(gate.clone()),
        ..MockCatalog::ok(vec![sample_provider("initech")])
    });
    let registry = registry(&client, fresh_cache(&path), unreachable_local());

    // The gated fetch never completes, so this only returns if the fetch is off the caller's path.
    let providers = tokio::time::timeout(Duration::from_secs(5), registry.get())
        .await
        .expect("fresh cache must not wait for the catalog")
        .unwrap();
    assert_eq!(&providers[..], &cached[..]);
    assert_eq!(registry.state(), RegistryState::Ready);

    registry.cancel_refresh();
    assert_eq!(fresh_cache(&path).load().unwrap(), cached);
}

#[tokio::test]
async fn test_fresh_cache_appends_local_provider() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    fresh_cache(&path)
        .save(&[sample_provider("acme"), sample_provider("globex")])
        .unwrap();

    let server = local_server();
    let client = Arc::new(MockCatalog::ok(vec![sample_provider("acme")]));
    let registry = registry(
        &client,
        fresh_cache(&path),
        LocalProber::new(server.base_url(), Duration::from_secs(5)),
    );

    let providers = registry.get().await.unwrap();
    assert_eq!(ids(&providers), vec!["acme", "globex", "ollama"]);
    let local = &providers[2];
    assert_eq!(local.default_large_model_id, "llama3:70b");
    assert_eq!(local.default_small_model_id, "mistral:7b");
    registry.cancel_refresh();
}

#[tokio::test]
async fn test_background_refresh_updates_disk_but_not_memory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    let cached = vec![sample_provider("acme")];
    fresh_cache(&path).save(&cached).unwrap();

    let gate = Arc::new(Notify::new());
    let refreshed = vec![sample_provider("acme"), sample_provider("initech")];
    let client = Arc::new(MockCatalog {
        gate: Some(gate.clone()),
        ..MockCatalog::ok(refreshed.clone())
    });
    let registry = registry(&client, fresh_cache(&path), unreachable_local());

    let first = registry.get().await.unwrap();
    assert_eq!(&first[..], &cached[..]);

    gate.notify_one();
    registry.wait_for_refresh().await;
    assert_eq!(client.calls(), 1);
    assert_eq!(fresh_cache(&path).load().unwrap(), refreshed);

    let second = registry.get().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_missing_cache_fetches_live_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("providers.json");
    let live = vec![sample_provider("acme"), sample_provider("globex")];
    let client = Arc::new(MockCatalog::ok(live.clone()));
    let registry = registry(&client, fresh_cache(&path), unreachable_local());

    let providers = registry.get().await.unwrap();
    assert_eq!(&providers[..], &live[..]);
    assert_eq!(client.calls(), 1);
    assert_eq!(fresh_cache(&path).load().unwrap(), live);
}

#[tokio::test]
async fn test_stale_cache_with_failing_fetch_falls_back_to_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    let cached = vec![sample_provider("acme")];
    fresh_cache(&path).save(&cached).unwrap();

    let client = Arc::new(MockCatalog::failing());
    let registry = registry(&client, stale_cache(&path), unreachable_local());

    let providers = registry.get().await.unwrap();
    assert_eq!(&providers[..], &cached[..]);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_stale_cache_is_replaced_by_live_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    fresh_cache(&path).save(&[sample_provider("acme")]).unwrap();

    let live = vec![sample_provider("globex")];
    let client = Arc::new(MockCatalog::ok(live.clone()));
    let registry = registry(&client, stale_cache(&path), unreachable_local());

    let providers = registry.get().await.unwrap();
    assert_eq!(&providers[..], &live[..]);
    assert_eq!(fresh_cache(&path).load().unwrap(), live);
}

#[tokio::test]
async fn test_fetch_timeout_falls_back_to_stale_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    let cached = vec![sample_provider("acme")];
    fresh_cache(&path).save(&cached).unwrap();

    let client = Arc::new(MockCatalog {
        delay: Duration::from_secs(30),
        ..MockCatalog::ok(vec![sample_provider("globex")])
    });
    let registry = registry(&client, stale_cache(&path), unreachable_local())
        .with_fetch_timeout(Duration::from_millis(50));

    let providers = registry.get().await.unwrap();
    assert_eq!(&providers[..], &cached[..]);
}

#[tokio::test]
async fn test_corrupt_fresh_cache_triggers_live_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    std::fs::write(&path, "{ not-json").unwrap();

    let live = vec![sample_provider("acme")];
    let client = Arc::new(MockCatalog::ok(live.clone()));
    let registry = registry(&client, fresh_cache(&path), unreachable_local());

    let providers = registry.get().await.unwrap();
    assert_eq!(&providers[..], &live[..]);
    assert_eq!(fresh_cache(&path).load().unwrap(), live);
}

#[tokio::test]
async fn test_corrupt_cache_with_failing_fetch_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    std::fs::write(&path, "{ not-json").unwrap();

    let client = Arc::new(MockCatalog::failing());
    let registry = registry(&client, stale_cache(&path), unreachable_local());

    assert!(matches!(
        registry.get().await,
        Err(RegistryError::Unavailable { .. })
    ));
}

#[tokio::test]
async fn test_no_source_fails_once_and_never_retries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    let client = Arc::new(MockCatalog::failing());
    let registry = registry(&client, fresh_cache(&path), unreachable_local());
    assert_eq!(registry.state(), RegistryState::Uninitialized);

    let first = registry.get().await.unwrap_err();
    assert_eq!(registry.state(), RegistryState::Failed);

    // A cache appearing later does not matter: the failure is final.
    fresh_cache(&path).save(&[sample_provider("acme")]).unwrap();
    let second = registry.get().await.unwrap_err();

    assert_eq!(first.to_string(), second.to_string());
    assert!(first.to_string().contains("no provider cache exists"));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_local_provider_alone_does_not_satisfy_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    let server = local_server();
    let client = Arc::new(MockCatalog::failing());
    let registry = registry(
        &client,
        fresh_cache(&path),
        LocalProber::new(server.base_url(), Duration::from_secs(5)),
    );

    assert!(registry.get().await.is_err());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_local_server_without_models_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    let server = MockServer::start();
    let tags = server.mock(|when, then| {
        when.method(GET).path("/api/tags");
        then.status(200).json_body(json!({ "models": [] }));
    });

    let live = vec![sample_provider("acme")];
    let client = Arc::new(MockCatalog::ok(live.clone()));
    let registry = registry(
        &client,
        fresh_cache(&path),
        LocalProber::new(server.base_url(), Duration::from_secs(5)),
    );

    let providers = registry.get().await.unwrap();
    tags.assert_calls(1);
    assert_eq!(&providers[..], &live[..]);
}

#[tokio::test]
async fn test_cached_local_entry_is_not_duplicated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    let mut old_local = sample_provider("ollama");
    old_local.name = "Ollama (Local)".to_string();
    fresh_cache(&path)
        .save(&[sample_provider("acme"), old_local])
        .unwrap();

    let client = Arc::new(MockCatalog::failing());

    // Local server down: the persisted local entry is dropped.
    let offline = registry(&client, fresh_cache(&path), unreachable_local());
    assert_eq!(ids(&offline.get().await.unwrap()), vec!["acme"]);
    offline.cancel_refresh();

    // Local server up: exactly one local entry, appended last.
    let server = local_server();
    let online = registry(
        &client,
        fresh_cache(&path),
        LocalProber::new(server.base_url(), Duration::from_secs(5)),
    );
    let providers = online.get().await.unwrap();
    assert_eq!(ids(&providers), vec!["acme", "ollama"]);
    assert_eq!(providers[1].models.len(), 2);
    online.cancel_refresh();
}

#[tokio::test]
async fn test_concurrent_first_callers_share_one_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    let client = Arc::new(MockCatalog {
        delay: Duration::from_millis(100),
        ..MockCatalog::ok(vec![sample_provider("acme")])
    });
    let registry = Arc::new(registry(&client, fresh_cache(&path), unreachable_local()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move { registry.get().await })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }
    assert_eq!(client.calls(), 1);
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
}

#[tokio::test]
async fn test_cancelled_first_caller_does_not_restart_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("providers.json");
    let client = Arc::new(MockCatalog {
        delay: Duration::from_millis(300),
        ..MockCatalog::ok(vec![sample_provider("acme")])
    });
    let registry = registry(&client, fresh_cache(&path), unreachable_local());

    let first = tokio::time::timeout(Duration::from_millis(50), registry.get()).await;
    assert!(first.is_err());
    assert_eq!(registry.state(), RegistryState::Initializing);

    let providers = registry.get().await.unwrap();
    assert_eq!(ids(&providers), vec!["acme"]);
    assert_eq!(registry.state(), RegistryState::Ready);
    assert_eq!(client.calls(), 1);
    assert_eq!(fresh_cache(&path).load().unwrap(), vec![sample_provider("acme")]);
}

#[test]
fn test_append_local_places_local_last() {
    let local = sample_provider("ollama");
    let merged = append_local(
        vec![sample_provider("ollama"), sample_provider("acme")],
        Some(local),
    );
    assert_eq!(ids(&merged), vec!["acme", "ollama"]);
    assert!(append_local(Vec::new(), None).is_empty());
}
