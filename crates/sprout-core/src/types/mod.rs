//! Core data types for package identities and manifests.
//!
//! The naming follows the npm ecosystem: an `Ident` names a package family,
//! a `Descriptor` adds a requested range, and a `Locator` pins a concrete
//! installable reference.

mod descriptor;
mod ident;
mod manifest;

pub use descriptor::{Descriptor, Locator};
pub use ident::Ident;
pub use manifest::{Manifest, Target};

// Concrete versions and requirements come straight from the semver crate;
// constraint solving beyond range matching is not Sprout's business.
pub use semver::{Version, VersionReq};
