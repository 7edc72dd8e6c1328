//! Requested and resolved package references.

use super::Ident;
use crate::error::SproutResult;
use semver::VersionReq;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ident plus a requested version range.
///
/// The range may be a semver requirement (`^1.2.3`), a dist-tag (`latest`,
/// `rc`) or a workspace reference. Two descriptors with the same ident but
/// different ranges are distinct values; manifest sections deduplicate by
/// ident only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Descriptor {
    pub ident: Ident,
    pub range: String,
}

/// A resolved descriptor: an ident plus a concrete installable reference
/// such as `npm:4.17.21` or `workspace:packages/foo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub ident: Ident,
    pub reference: String,
}

impl Descriptor {
    /// Create a descriptor from an ident and a range string
    pub fn new(ident: Ident, range: impl Into<String>) -> Self {
        Self {
            ident,
            range: range.into(),
        }
    }

    /// Parse a raw request such as `lodash`, `lodash@^4.0.0` or
    /// `@types/node@latest`. A request without a range defaults to the
    /// `latest` tag.
    pub fn parse(input: &str) -> SproutResult<Self> {
        let input = input.trim();

        // The leading @ of a scope is not a range separator.
        let split_at = match input.strip_prefix('@') {
            Some(rest) => rest.find('@').map(|index| index + 1),
            None => input.find('@'),
        };

        match split_at {
            Some(index) if !input[index + 1..].is_empty() => {
                let ident: Ident = input[..index].parse()?;
                Ok(Descriptor::new(ident, &input[index + 1..]))
            },
            _ => {
                let ident: Ident = input.trim_end_matches('@').parse()?;
                Ok(Descriptor::new(ident, "latest"))
            },
        }
    }

    /// The range as a semver requirement, when it is one. Tags and
    /// workspace references return `None`.
    pub fn version_req(&self) -> Option<VersionReq> {
        VersionReq::parse(&self.range).ok()
    }
}

impl Locator {
    /// Create a locator from an ident and a concrete reference
    pub fn new(ident: Ident, reference: impl Into<String>) -> Self {
        Self {
            ident,
            reference: reference.into(),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.ident, self.range)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.ident, self.reference)
    }
}
