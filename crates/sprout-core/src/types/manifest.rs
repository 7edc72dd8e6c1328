//! Workspace manifest sections.

use super::{Descriptor, Ident};
use std::collections::HashMap;

/// Which manifest section a dependency belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Regular runtime dependency
    Regular,
    /// Development-only dependency
    Development,
    /// Peer dependency (must be provided by the consumer)
    Peer,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Regular, Target::Development, Target::Peer];

    /// The package.json field this section serializes to
    pub fn field_name(&self) -> &'static str {
        match self {
            Target::Regular => "dependencies",
            Target::Development => "devDependencies",
            Target::Peer => "peerDependencies",
        }
    }
}

/// The dependency sections of a single workspace manifest.
///
/// Each section maps an ident to the descriptor requested for it; inserting
/// a second descriptor for the same ident replaces the first.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    dependencies: HashMap<Ident, Descriptor>,
    dev_dependencies: HashMap<Ident, Descriptor>,
    peer_dependencies: HashMap<Ident, Descriptor>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to one section
    pub fn section(&self, target: Target) -> &HashMap<Ident, Descriptor> {
        match target {
            Target::Regular => &self.dependencies,
            Target::Development => &self.dev_dependencies,
            Target::Peer => &self.peer_dependencies,
        }
    }

    /// Write access to one section
    pub fn section_mut(&mut self, target: Target) -> &mut HashMap<Ident, Descriptor> {
        match target {
            Target::Regular => &mut self.dependencies,
            Target::Development => &mut self.dev_dependencies,
            Target::Peer => &mut self.peer_dependencies,
        }
    }

    /// Set a dependency in the given section, keyed by its ident
    pub fn set(&mut self, target: Target, descriptor: Descriptor) {
        self.section_mut(target)
            .insert(descriptor.ident.clone(), descriptor);
    }

    /// Look up a dependency by ident across all sections, regular first
    pub fn find(&self, ident: &Ident) -> Option<(Target, &Descriptor)> {
        Target::ALL.iter().find_map(|target| {
            self.section(*target)
                .get(ident)
                .map(|descriptor| (*target, descriptor))
        })
    }
}
