//! Package cache capability consumed by the install flow.

use crate::error::SproutResult;
use crate::types::{Descriptor, Locator};
use std::future::Future;

/// Outcome of ensuring one descriptor is available locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The package was already cached
    Hit(Locator),
    /// The package had to be fetched
    Miss(Locator),
}

impl CacheOutcome {
    pub fn locator(&self) -> &Locator {
        match self {
            CacheOutcome::Hit(locator) | CacheOutcome::Miss(locator) => locator,
        }
    }
}

/// Point lookup/fetch keyed by package identity, safe under concurrent use.
///
/// Implementations pin the descriptor to a concrete locator as a side
/// effect; suggestion strategies only ever read through this seam, so
/// concurrent suggestion tasks may share one cache instance.
pub trait Cache: Send + Sync {
    /// Make the package available locally, reporting whether it already was
    fn ensure(
        &self,
        descriptor: &Descriptor,
    ) -> impl Future<Output = SproutResult<CacheOutcome>> + Send;
}
