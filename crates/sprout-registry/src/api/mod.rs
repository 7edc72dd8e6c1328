//! npm registry API response types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Package metadata response from the npm registry, abbreviated format
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PackageMetadata {
    /// Package name
    pub name: String,
    /// Package description
    pub description: Option<String>,
    /// Tag to version mapping (`latest`, `next`, ...)
    #[serde(rename = "dist-tags")]
    pub dist_tags: HashMap<String, String>,
    /// All published versions
    pub versions: HashMap<String, VersionEntry>,
}

/// Metadata for a single published version
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionEntry {
    /// Version string
    pub version: String,
    /// Dependencies
    pub dependencies: Option<HashMap<String, String>>,
    /// Peer dependencies
    #[serde(rename = "peerDependencies")]
    pub peer_dependencies: Option<HashMap<String, String>>,
}
