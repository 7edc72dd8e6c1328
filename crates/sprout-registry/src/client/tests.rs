//! Unit tests for registry client

use super::*;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn lodash_metadata() -> serde_json::Value {
    serde_json::json!({
        "name": "lodash",
        "description": "Lodash modular utilities",
        "dist-tags": {
            "latest": "4.17.21"
        },
        "versions": {
            "4.17.20": { "version": "4.17.20" },
            "4.17.21": { "version": "4.17.21" }
        }
    })
}

async fn client_for(server: &MockServer) -> RegistryClient {
    let mut client = RegistryClient::new().unwrap();
    client.base_url = server.uri();
    client
}

#[tokio::test]
async fn test_registry_client_creation() {
    let client = RegistryClient::new().unwrap();
    assert_eq!(client.base_url, "https://registry.npmjs.org");
    assert_eq!(client.retry_config.max_retries, 3);
}

#[tokio::test]
async fn test_retry_config_default() {
    let config = RetryConfig::default();
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.initial_delay, Duration::from_millis(100));
    assert_eq!(config.max_delay, Duration::from_secs(10));
    assert_eq!(config.multiplier, 2.0);
}

#[test]
fn test_encode_package_name() {
    // Regular package
    assert_eq!(RegistryClient::encode_package_name("lodash"), "lodash");

    // Scoped package
    assert_eq!(
        RegistryClient::encode_package_name("@types/node"),
        "@types%2fnode"
    );
}

#[tokio::test]
async fn test_fetch_metadata_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodash"))
        .and(header("Accept", "application/vnd.npm.install-v1+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lodash_metadata()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let metadata = client.fetch_metadata(&Ident::new("lodash")).await.unwrap();
    assert_eq!(metadata.name, "lodash");
    assert_eq!(metadata.versions.len(), 2);
    assert_eq!(metadata.dist_tags["latest"], "4.17.21");
}

#[tokio::test]
async fn test_fetch_metadata_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nonexistent-package"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client.fetch_metadata(&Ident::new("nonexistent-package")).await;

    match result.unwrap_err() {
        SproutError::PackageNotFound { name } => {
            assert_eq!(name, "nonexistent-package");
        },
        other => panic!("Expected PackageNotFound error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_scoped_package_url_encoding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@types%2fnode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "@types/node",
            "dist-tags": { "latest": "20.10.0" },
            "versions": {}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client.fetch_metadata(&Ident::scoped("types", "node")).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_resolve_tag() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lodash_metadata()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let version = client
        .resolve_tag(&Ident::new("lodash"), "latest")
        .await
        .unwrap();
    assert_eq!(version, Version::new(4, 17, 21));
}

#[tokio::test]
async fn test_resolve_unknown_tag() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lodash_metadata()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client.resolve_tag(&Ident::new("lodash"), "next").await;

    match result.unwrap_err() {
        SproutError::TagNotFound { package, tag } => {
            assert_eq!(package, "lodash");
            assert_eq!(tag, "next");
        },
        other => panic!("Expected TagNotFound error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let mock_server = MockServer::start().await;

    // Every attempt fails; the client must give up after max_retries + 1.
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut client = RegistryClient::with_config(RetryConfig {
        max_retries: 2,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        multiplier: 2.0,
    })
    .unwrap();
    client.base_url = mock_server.uri();

    let result = client.fetch_metadata(&Ident::new("flaky")).await;
    assert!(matches!(result.unwrap_err(), SproutError::Network { .. }));
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client.fetch_metadata(&Ident::new("gone")).await;
    assert!(matches!(result.unwrap_err(), SproutError::PackageNotFound { .. }));
}
