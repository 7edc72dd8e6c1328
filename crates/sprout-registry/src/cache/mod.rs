//! Metadata caching with TTL support.
//!
//! The cache backs the install flow's hit/miss accounting: a descriptor
//! whose metadata is already fresh counts as a cache hit, anything that
//! forces a registry round-trip counts as a miss. Lookups are safe under
//! concurrent use; suggestion tasks share one instance without locking.

use dashmap::DashMap;
use semver::Version;
use std::time::{Duration, SystemTime};

use crate::api::PackageMetadata;
use crate::client::RegistryClient;
use sprout_core::{Cache, CacheOutcome, Descriptor, Ident, Locator, SproutError, SproutResult};

/// Cache entry with TTL
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Cached metadata
    metadata: PackageMetadata,
    /// When the entry was stored
    stored_at: SystemTime,
    /// Time-to-live duration
    ttl: Duration,
}

impl CacheEntry {
    fn new(metadata: PackageMetadata, ttl: Duration) -> Self {
        Self {
            metadata,
            stored_at: SystemTime::now(),
            ttl,
        }
    }

    /// Check if cache entry is still fresh
    fn is_fresh(&self) -> bool {
        match self.stored_at.elapsed() {
            Ok(elapsed) => elapsed < self.ttl,
            Err(_) => false, // Clock went backwards, consider stale
        }
    }
}

/// Registry-backed package cache with TTL'd metadata entries
#[derive(Debug)]
pub struct RegistryCache {
    client: RegistryClient,
    entries: DashMap<Ident, CacheEntry>,
    ttl: Duration,
}

impl RegistryCache {
    /// Create a cache with the default TTL (1 hour)
    pub fn new(client: RegistryClient) -> Self {
        Self::with_ttl(client, Duration::from_secs(3600))
    }

    /// Create a cache with a custom TTL
    pub fn with_ttl(client: RegistryClient, ttl: Duration) -> Self {
        Self {
            client,
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Get cached metadata if fresh
    pub fn lookup(&self, ident: &Ident) -> Option<PackageMetadata> {
        let entry = self.entries.get(ident)?;
        if entry.is_fresh() {
            Some(entry.metadata.clone())
        } else {
            drop(entry);
            // Remove stale entry
            self.entries.remove(ident);
            None
        }
    }

    /// Pin a descriptor to the concrete version its range selects: the
    /// highest satisfying version for a semver range, the tagged version
    /// for a dist-tag.
    fn pin_version(metadata: &PackageMetadata, descriptor: &Descriptor) -> SproutResult<Version> {
        if let Some(req) = descriptor.version_req() {
            metadata
                .versions
                .keys()
                .filter_map(|raw| Version::parse(raw).ok())
                .filter(|version| req.matches(version))
                .max()
                .ok_or_else(|| SproutError::NoCompatibleVersion {
                    package: descriptor.ident.to_string(),
                    range: descriptor.range.clone(),
                })
        } else {
            let raw = metadata
                .dist_tags
                .get(&descriptor.range)
                .ok_or_else(|| SproutError::TagNotFound {
                    package: descriptor.ident.to_string(),
                    tag: descriptor.range.clone(),
                })?;
            Version::parse(raw).map_err(|error| SproutError::VersionParse {
                input: raw.clone(),
                message: error.to_string(),
            })
        }
    }
}

impl Cache for RegistryCache {
    async fn ensure(&self, descriptor: &Descriptor) -> SproutResult<CacheOutcome> {
        if let Some(metadata) = self.lookup(&descriptor.ident) {
            let version = Self::pin_version(&metadata, descriptor)?;
            let locator = Locator::new(descriptor.ident.clone(), format!("npm:{}", version));
            return Ok(CacheOutcome::Hit(locator));
        }

        let metadata = self.client.fetch_metadata(&descriptor.ident).await?;
        let version = Self::pin_version(&metadata, descriptor)?;
        self.entries.insert(
            descriptor.ident.clone(),
            CacheEntry::new(metadata, self.ttl),
        );

        let locator = Locator::new(descriptor.ident.clone(), format!("npm:{}", version));
        Ok(CacheOutcome::Miss(locator))
    }
}

#[cfg(test)]
mod tests;
