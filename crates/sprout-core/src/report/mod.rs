//! Execution reports: lifecycle, counters and exit-code derivation.
//!
//! Every long-running operation is driven through a report. Two variants
//! share the same counters/lifecycle state: [`StreamReport`] emits
//! human-readable lines while it counts, [`LightReport`] only counts. Both
//! expose the same capability set through the [`Report`] trait, so
//! collaborators such as `Project::install` stay agnostic of the variant.
//!
//! A report is created at the start of one operation, mutated throughout,
//! finalized exactly once and read-only afterwards. Reports hold no internal
//! locking; the `&mut` receivers make exclusive access a compile-time
//! property, and callers sharing one across tasks must serialize access
//! themselves.

mod light;
mod stream;

pub use light::LightReport;
pub use stream::StreamReport;

use crate::types::Locator;
use std::time::{Duration, Instant};


/// Stable message codes carried by every report line.
///
/// Codes format as fixed-width `SPnnnn` identifiers; code zero tags generic
/// progress output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageName {
    Unnamed,
    CantSuggestResolutions,
}

impl MessageName {
    pub fn code(&self) -> u32 {
        match self {
            MessageName::Unnamed => 0,
            MessageName::CantSuggestResolutions => 1,
        }
    }
}

/// Capability set shared by both report variants
pub trait Report {
    fn report_info(&mut self, name: MessageName, text: &str);
    fn report_warning(&mut self, name: MessageName, text: &str);
    fn report_error(&mut self, name: MessageName, text: &str);

    /// Counter-only accounting used by the closing summary
    fn report_cache_hit(&mut self, locator: &Locator);
    fn report_cache_miss(&mut self, locator: &Locator);

    fn has_errors(&self) -> bool;

    /// 1 iff any error was recorded, else 0
    fn exit_code(&self) -> i32;
}

/// Counters and lifecycle shared by the report variants.
///
/// Counters are monotonically non-decreasing and freeze once the report is
/// finalized.
#[derive(Debug)]
pub(crate) struct ReportState {
    cache_hit_count: usize,
    cache_miss_count: usize,
    warning_count: usize,
    error_count: usize,
    start_time: Instant,
    indent: usize,
    finalized: bool,
}

impl ReportState {
    pub(crate) fn new() -> Self {
        Self {
            cache_hit_count: 0,
            cache_miss_count: 0,
            warning_count: 0,
            error_count: 0,
            start_time: Instant::now(),
            indent: 0,
            finalized: false,
        }
    }

    pub(crate) fn record_warning(&mut self) {
        if !self.finalized {
            self.warning_count += 1;
        }
    }

    pub(crate) fn record_error(&mut self) {
        if !self.finalized {
            self.error_count += 1;
        }
    }

    pub(crate) fn record_cache_hit(&mut self) {
        if !self.finalized {
            self.cache_hit_count += 1;
        }
    }

    pub(crate) fn record_cache_miss(&mut self) {
        if !self.finalized {
            self.cache_miss_count += 1;
        }
    }

    pub(crate) fn push_indent(&mut self) {
        self.indent += 1;
    }

    pub(crate) fn pop_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Transition to finalized; true only on the first call
    pub(crate) fn finalize_once(&mut self) -> bool {
        if self.finalized {
            return false;
        }
        self.finalized = true;
        true
    }

    pub(crate) fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub(crate) fn exit_code(&self) -> i32 {
        if self.has_errors() {
            1
        } else {
            0
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// The repeated two-character marker prefixing nested lines
    pub(crate) fn indent_prefix(&self) -> String {
        "│ ".repeat(self.indent)
    }

    /// Status phrase for the closing summary, by severity priority
    pub(crate) fn install_status(&self) -> &'static str {
        if self.error_count > 0 {
            "Failed with errors"
        } else if self.warning_count > 0 {
            "Done with warnings"
        } else {
            "Done"
        }
    }

    /// Cache accounting clause for the closing summary, `None` when no
    /// cache activity was recorded. Covers the nine {0, 1, many} hit/miss
    /// combinations with matching singular/plural wording.
    pub(crate) fn cache_clause(&self) -> Option<String> {
        let mut clause = match self.cache_hit_count {
            0 => String::new(),
            1 => "one package was already cached".to_string(),
            hits => format!("{} packages were already cached", hits),
        };

        if self.cache_hit_count > 0 {
            match self.cache_miss_count {
                0 => {},
                1 => clause.push_str(", one had to be fetched"),
                misses => clause.push_str(&format!(", {} had to be fetched", misses)),
            }
        } else {
            match self.cache_miss_count {
                0 => {},
                1 => clause.push_str("one package had to be fetched"),
                misses => clause.push_str(&format!("{} packages had to be fetched", misses)),
            }
        }

        if clause.is_empty() {
            None
        } else {
            Some(clause)
        }
    }
}

/// Human-readable wall-clock rendering: centisecond precision below a
/// minute, minutes above.
pub(crate) fn format_timing(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 60_000 {
        format!("{}s", (millis as f64 / 10.0).round() / 100.0)
    } else {
        format!("{}m", (millis as f64 / 600.0).round() / 100.0)
    }
}
