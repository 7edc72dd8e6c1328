//! # sprout-suggest
//!
//! Multi-strategy dependency version suggestion engine.
//!
//! Given a requested descriptor, the engine consults independent knowledge
//! sources in caller-chosen priority order — sibling workspaces (REUSE),
//! the resolved project graph (PROJECT), the remote registry (LATEST) —
//! and accumulates candidate suggestions until the caller's limit is
//! reached. Strategy order is the ranking: the engine never reorders
//! candidates by any internal quality score.
//!
//! Producing zero suggestions is a normal result, not an error; judging
//! its severity is the caller's business.

use semver::Version;
use sprout_core::{Descriptor, Ident, Locator, Project, SproutResult, Target};
use sprout_registry::RegistryClient;
use std::future::Future;
use tracing::trace;

mod strategies;


/// Range-prefix policy applied when a concrete version is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `^`-prefixed range, accepts compatible minor/patch updates
    Caret,
    /// `~`-prefixed range, accepts patch updates
    Tilde,
    /// The literal version
    Exact,
}

impl Modifier {
    /// Synthesize a range string for a resolved version
    pub fn apply(&self, version: &Version) -> String {
        match self {
            Modifier::Caret => format!("^{}", version),
            Modifier::Tilde => format!("~{}", version),
            Modifier::Exact => version.to_string(),
        }
    }
}

/// A named algorithm contributing candidate suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Ranges other workspaces already use for the same package
    Reuse,
    /// A compatible version already present in the resolved graph
    Project,
    /// The registry's answer for the requested tag
    Latest,
}

/// A candidate descriptor with a human-readable justification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub descriptor: Descriptor,
    pub reason: String,
}

impl Suggestion {
    pub fn new(descriptor: Descriptor, reason: impl Into<String>) -> Self {
        Self {
            descriptor,
            reason: reason.into(),
        }
    }
}

/// Registry lookup capability used by the LATEST strategy.
///
/// The only network seam of the engine; tests substitute a scripted
/// resolver.
pub trait TagResolver: Send + Sync {
    /// Resolve a dist-tag to the concrete version it points at
    fn resolve_tag(
        &self,
        ident: &Ident,
        tag: &str,
    ) -> impl Future<Output = SproutResult<Version>> + Send;
}

impl TagResolver for sprout_registry::RegistryClient {
    async fn resolve_tag(&self, ident: &Ident, tag: &str) -> SproutResult<Version> {
        RegistryClient::resolve_tag(self, ident, tag).await
    }
}

/// Request context shared by every strategy.
///
/// The project and resolver are read-only here; concurrent suggestion
/// tasks may share them freely.
pub struct SuggestOptions<'a, R: TagResolver> {
    pub project: &'a Project,
    pub target: Target,
    pub modifier: Modifier,
    pub strategies: &'a [Strategy],
    pub max_results: usize,
    pub resolver: &'a R,
}

/// Gather suggestions for one request.
///
/// Strategies run in the given order and their output accumulates in that
/// order; collection stops as soon as `max_results` candidates exist.
/// `from_locator` identifies the requesting workspace so REUSE skips it.
pub async fn suggested_descriptors<R: TagResolver>(
    request: &Descriptor,
    from_locator: Option<&Locator>,
    options: &SuggestOptions<'_, R>,
) -> SproutResult<Vec<Suggestion>> {
    let mut suggestions = Vec::new();

    for strategy in options.strategies {
        if suggestions.len() >= options.max_results {
            break;
        }

        match strategy {
            Strategy::Reuse => {
                suggestions.extend(strategies::reuse(request, from_locator, options.project));
            },
            Strategy::Project => {
                suggestions.extend(strategies::project(request, options.project, options.modifier));
            },
            Strategy::Latest => {
                suggestions.extend(strategies::latest(request, options).await?);
            },
        }
        trace!(
            request = %request,
            strategy = ?strategy,
            collected = suggestions.len(),
            "strategy pass finished"
        );
    }

    suggestions.truncate(options.max_results);
    Ok(suggestions)
}
