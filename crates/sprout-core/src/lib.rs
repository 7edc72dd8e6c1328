//! # sprout-core
//!
//! Core types and shared machinery for the Sprout package manager.
//!
//! This crate provides:
//! - Package identity types (Ident, Descriptor, Locator) and the manifest
//!   model keyed by them
//! - The execution report lifecycle (StreamReport, LightReport) that every
//!   long-running operation runs inside
//! - The project/workspace model and the install flow's cache seam
//! - SproutError for unified error handling and Configuration for flags,
//!   styling and hooks
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: identity and manifest data types
//! - `report`: counters, lifecycle and the two report variants
//! - `project`: workspace discovery, persistence and install
//! - `cache`: the capability install consumes
//! - `config`: flags, output styling, hook registry
//! - `error`: error types and result aliases

pub mod cache;
pub mod config;
pub mod error;
pub mod project;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use cache::{Cache, CacheOutcome};
pub use config::{Configuration, DependencyAddition, Style};
pub use error::{SproutError, SproutResult};
pub use project::{Project, Workspace};
pub use report::{LightReport, MessageName, Report, StreamReport};
pub use types::{Descriptor, Ident, Locator, Manifest, Target, Version, VersionReq};
