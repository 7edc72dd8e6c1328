//! Error types and result aliases for Sprout operations.
//!
//! Provides a unified error type that covers all possible error conditions
//! across the Sprout ecosystem with actionable error messages.

use thiserror::Error;

/// Unified error type for all Sprout operations
#[derive(Error, Debug)]
pub enum SproutError {
    // Manifest errors
    #[error("No package.json found at {path}")]
    ManifestNotFound { path: String },

    #[error("Failed to parse {path}: {message}")]
    ManifestParse { path: String, message: String },

    #[error("Invalid package identifier '{input}'")]
    InvalidIdent { input: String },

    #[error("Invalid version '{input}': {message}")]
    VersionParse { input: String, message: String },

    // Registry errors
    #[error("Package '{name}' not found in registry")]
    PackageNotFound { name: String },

    #[error("Tag '{tag}' does not exist for package '{package}'")]
    TagNotFound { package: String, tag: String },

    #[error("No published version of '{package}' satisfies '{range}'")]
    NoCompatibleVersion { package: String, range: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Interaction errors
    #[error("Selection prompt aborted: {reason}")]
    PromptAborted { reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// An error that has already been attributed to a report. Timer scopes
    /// and run entry points skip errors carrying this marker so that a
    /// single failure propagating through nested scopes is counted once.
    #[error(transparent)]
    Reported(Box<SproutError>),
}

/// Result type alias for Sprout operations
pub type SproutResult<T> = Result<T, SproutError>;

impl SproutError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Check whether this error was already attributed to a report
    pub fn is_reported(&self) -> bool {
        matches!(self, SproutError::Reported(_))
    }

    /// Mark this error as attributed to a report. Idempotent.
    pub fn into_reported(self) -> Self {
        match self {
            error @ SproutError::Reported(_) => error,
            error => SproutError::Reported(Box::new(error)),
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            SproutError::ManifestNotFound { .. } => {
                Some("Run the command from a directory containing a package.json")
            },
            SproutError::PackageNotFound { .. } => {
                Some("Check the package name spelling or try searching the registry")
            },
            SproutError::TagNotFound { .. } => {
                Some("List the package's dist-tags on the registry to find a valid one")
            },
            SproutError::Network { .. } => Some("Check your internet connection and try again"),
            SproutError::Reported(inner) => inner.suggestion(),
            _ => None,
        }
    }
}
