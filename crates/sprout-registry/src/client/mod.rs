//! HTTP client implementation with connection pooling and retry logic

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::api::PackageMetadata;
use semver::Version;
use sprout_core::{Ident, SproutError, SproutResult};
use tracing::debug;

/// Configuration for exponential backoff retry logic
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

/// HTTP client for npm registry metadata lookups
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Underlying HTTP client with connection pooling
    client: Client,
    /// Retry configuration
    retry_config: RetryConfig,
    /// Base registry URL, overridable for tests
    pub(crate) base_url: String,
}

impl RegistryClient {
    /// Create new registry client with connection pooling
    pub fn new() -> SproutResult<Self> {
        Self::with_config(RetryConfig::default())
    }

    /// Create registry client with custom retry configuration
    pub fn with_config(retry_config: RetryConfig) -> SproutResult<Self> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .user_agent("sprout/0.1.0")
            .build()
            .map_err(|e| SproutError::network("Failed to create HTTP client".to_string(), e))?;

        Ok(Self {
            client,
            retry_config,
            base_url: "https://registry.npmjs.org".to_string(),
        })
    }

    /// Execute an operation with exponential backoff retry logic
    async fn with_retry<F, Fut, T>(&self, operation: F) -> SproutResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = SproutResult<T>>,
    {
        let mut delay = self.retry_config.initial_delay;
        let mut last_error = None;

        for attempt in 0..=self.retry_config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    // Missing packages won't appear on a retry
                    let retriable = !matches!(error, SproutError::PackageNotFound { .. });
                    last_error = Some(error);

                    if !retriable || attempt == self.retry_config.max_retries {
                        break;
                    }

                    tokio::time::sleep(delay).await;

                    delay = std::cmp::min(
                        Duration::from_millis(
                            (delay.as_millis() as f64 * self.retry_config.multiplier) as u64,
                        ),
                        self.retry_config.max_delay,
                    );
                },
            }
        }

        Err(last_error.unwrap_or_else(|| SproutError::Network {
            message: "Retry operation failed without error".to_string(),
            source: None,
        }))
    }

    /// Fetch package metadata with retry logic
    pub async fn fetch_metadata(&self, ident: &Ident) -> SproutResult<PackageMetadata> {
        let name = ident.to_string();
        let url = format!("{}/{}", self.base_url, Self::encode_package_name(&name));
        debug!(package = %name, "fetching registry metadata");

        self.with_retry(|| async {
            let response = self
                .client
                .get(&url)
                .header("Accept", "application/vnd.npm.install-v1+json")
                .send()
                .await
                .map_err(|e| SproutError::network(format!("Failed to fetch metadata: {}", e), e))?;

            match response.status() {
                reqwest::StatusCode::OK => response
                    .json::<PackageMetadata>()
                    .await
                    .map_err(|e| SproutError::network(format!("Failed to parse metadata: {}", e), e)),
                reqwest::StatusCode::NOT_FOUND => {
                    Err(SproutError::PackageNotFound { name: name.clone() })
                },
                status => Err(SproutError::Network {
                    message: format!("Registry returned status {} for {}", status, name),
                    source: None,
                }),
            }
        })
        .await
    }

    /// Resolve a dist-tag to the concrete version it currently points at
    pub async fn resolve_tag(&self, ident: &Ident, tag: &str) -> SproutResult<Version> {
        let metadata = self.fetch_metadata(ident).await?;

        let raw = metadata
            .dist_tags
            .get(tag)
            .ok_or_else(|| SproutError::TagNotFound {
                package: ident.to_string(),
                tag: tag.to_string(),
            })?;

        Version::parse(raw).map_err(|error| SproutError::VersionParse {
            input: raw.clone(),
            message: error.to_string(),
        })
    }

    /// Encode package name for URL (handle scoped packages)
    fn encode_package_name(name: &str) -> String {
        if name.starts_with('@') {
            // Scoped package: @org/pkg → @org%2fpkg
            name.replace('/', "%2f")
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests;
