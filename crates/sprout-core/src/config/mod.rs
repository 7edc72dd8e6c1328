//! Runtime configuration: feature flags, output styling and hooks.
//!
//! Styling respects the NO_COLOR environment variable and TTY detection so
//! piped output stays free of escape codes.

use crate::error::SproutError;
use crate::types::{Descriptor, Ident, Target};
use crate::SproutResult;
use std::env;
use std::io::{self, IsTerminal};

/// Presentation style for a piece of report output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    BlueBright,
    YellowBright,
    RedBright,
    Bold,
}

impl Style {
    fn ansi_code(&self) -> &'static str {
        match self {
            Style::BlueBright => "94",
            Style::YellowBright => "93",
            Style::RedBright => "91",
            Style::Bold => "1",
        }
    }
}

/// One dependency applied to a workspace manifest, as seen by hooks
#[derive(Debug, Clone)]
pub struct DependencyAddition {
    pub workspace: Ident,
    pub target: Target,
    pub descriptor: Descriptor,
}

/// Handler invoked after the add command has applied its selections.
///
/// Handlers run synchronously, in registration order, with the full batch
/// of additions. A failing handler does not stop the remaining ones; its
/// error is surfaced as a warning on the install report.
pub type AfterDependencyAddedHook =
    Box<dyn Fn(&[DependencyAddition]) -> SproutResult<()> + Send + Sync>;

/// Feature flags, formatting and the hook registry
pub struct Configuration {
    enable_timers: bool,
    enable_colors: bool,
    after_dependency_added: Vec<AfterDependencyAddedHook>,
}

impl Configuration {
    /// Create a configuration with explicit flags
    pub fn new(enable_timers: bool, enable_colors: bool) -> Self {
        Self {
            enable_timers,
            enable_colors,
            after_dependency_added: Vec::new(),
        }
    }

    /// Detect settings from the environment
    pub fn detect() -> Self {
        Self::new(true, Self::should_use_colors())
    }

    fn should_use_colors() -> bool {
        // Respect NO_COLOR environment variable
        if env::var("NO_COLOR").is_ok() {
            return false;
        }

        io::stderr().is_terminal() && io::stdout().is_terminal()
    }

    /// Whether timer scopes and the final summary include elapsed times
    pub fn enable_timers(&self) -> bool {
        self.enable_timers
    }

    /// Apply a presentation style to a piece of text
    pub fn format(&self, text: &str, style: Style) -> String {
        if self.enable_colors {
            format!("\x1b[{}m{}\x1b[0m", style.ansi_code(), text)
        } else {
            text.to_string()
        }
    }

    /// Register a handler for the after-dependency-added hook
    pub fn register_after_dependency_added(&mut self, hook: AfterDependencyAddedHook) {
        self.after_dependency_added.push(hook);
    }

    /// Invoke every registered handler in order with the full batch.
    ///
    /// Failures are collected rather than propagated; the caller decides
    /// how loudly to surface them.
    pub fn trigger_after_dependency_added(
        &self,
        additions: &[DependencyAddition],
    ) -> Vec<SproutError> {
        self.after_dependency_added
            .iter()
            .filter_map(|hook| hook(additions).err())
            .collect()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::detect()
    }
}
