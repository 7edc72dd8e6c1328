//! npm registry client for Sprout
//!
//! This crate provides HTTP client functionality for fetching package
//! metadata from the npm registry with connection pooling and retry logic,
//! plus a TTL metadata cache that backs the install flow's cache-hit
//! accounting.

pub mod api;
pub mod cache;
pub mod client;

// Re-export main types
pub use api::{PackageMetadata, VersionEntry};
pub use cache::RegistryCache;
pub use client::{RegistryClient, RetryConfig};
