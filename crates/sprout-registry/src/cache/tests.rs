//! Unit tests for the registry cache

use super::*;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn lodash_metadata() -> serde_json::Value {
    serde_json::json!({
        "name": "lodash",
        "dist-tags": { "latest": "4.17.21" },
        "versions": {
            "3.10.1": { "version": "3.10.1" },
            "4.17.20": { "version": "4.17.20" },
            "4.17.21": { "version": "4.17.21" }
        }
    })
}

async fn cache_for(server: &MockServer, ttl: Duration) -> RegistryCache {
    let mut client = RegistryClient::new().unwrap();
    client.base_url = server.uri();
    RegistryCache::with_ttl(client, ttl)
}

fn descriptor(name: &str, range: &str) -> Descriptor {
    Descriptor::new(Ident::new(name), range)
}

#[tokio::test]
async fn test_first_ensure_misses_then_hits() {
    let mock_server = MockServer::start().await;

    // A second round-trip would trip the expectation.
    Mock::given(method("GET"))
        .and(path("/lodash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lodash_metadata()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = cache_for(&mock_server, Duration::from_secs(3600)).await;
    let request = descriptor("lodash", "^4.17.0");

    let first = cache.ensure(&request).await.unwrap();
    assert!(matches!(first, CacheOutcome::Hit(_) | CacheOutcome::Miss(_)));
    assert!(matches!(&first, CacheOutcome::Miss(locator) if locator.reference == "npm:4.17.21"));

    let second = cache.ensure(&request).await.unwrap();
    assert!(matches!(&second, CacheOutcome::Hit(locator) if locator.reference == "npm:4.17.21"));
}

#[tokio::test]
async fn test_stale_entry_is_refetched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lodash_metadata()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let cache = cache_for(&mock_server, Duration::from_millis(0)).await;
    let request = descriptor("lodash", "latest");

    assert!(matches!(
        cache.ensure(&request).await.unwrap(),
        CacheOutcome::Miss(_)
    ));
    assert!(matches!(
        cache.ensure(&request).await.unwrap(),
        CacheOutcome::Miss(_)
    ));
}

#[tokio::test]
async fn test_pin_version_prefers_highest_satisfying() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lodash_metadata()))
        .mount(&mock_server)
        .await;

    let cache = cache_for(&mock_server, Duration::from_secs(3600)).await;

    let outcome = cache.ensure(&descriptor("lodash", "^3.0.0")).await.unwrap();
    assert_eq!(outcome.locator().reference, "npm:3.10.1");
}

#[tokio::test]
async fn test_no_compatible_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lodash_metadata()))
        .mount(&mock_server)
        .await;

    let cache = cache_for(&mock_server, Duration::from_secs(3600)).await;
    let result = cache.ensure(&descriptor("lodash", "^99.0.0")).await;

    assert!(matches!(
        result.unwrap_err(),
        SproutError::NoCompatibleVersion { .. }
    ));
}

#[tokio::test]
async fn test_tag_resolution_through_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lodash_metadata()))
        .mount(&mock_server)
        .await;

    let cache = cache_for(&mock_server, Duration::from_secs(3600)).await;

    let outcome = cache.ensure(&descriptor("lodash", "latest")).await.unwrap();
    assert_eq!(outcome.locator().reference, "npm:4.17.21");

    let missing = cache.ensure(&descriptor("lodash", "next")).await;
    assert!(matches!(missing.unwrap_err(), SproutError::TagNotFound { .. }));
}

#[tokio::test]
async fn test_concurrent_lookups_share_one_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lodash_metadata()))
        .mount(&mock_server)
        .await;

    let cache = std::sync::Arc::new(cache_for(&mock_server, Duration::from_secs(3600)).await);
    cache.ensure(&descriptor("lodash", "latest")).await.unwrap();

    // Warm cache: concurrent readers all hit without corrupting state.
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let cache = std::sync::Arc::clone(&cache);
            tokio::spawn(async move { cache.ensure(&descriptor("lodash", "^4.0.0")).await })
        })
        .collect();

    for task in tasks {
        let outcome = task.await.unwrap().unwrap();
        assert!(matches!(outcome, CacheOutcome::Hit(_)));
    }
}
