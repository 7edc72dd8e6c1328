//! Validation-only report.

use super::{MessageName, Report, ReportState};
use crate::error::{SproutError, SproutResult};
use crate::types::Locator;

/// Report variant that tracks counters without emitting anything.
///
/// Used for validation passes whose only observable outcome is the exit
/// code, such as the pre-flight check of the add command.
pub struct LightReport {
    state: ReportState,
}

impl LightReport {
    pub fn new() -> Self {
        Self {
            state: ReportState::new(),
        }
    }

    /// Run entry point mirroring [`StreamReport::start`]: the operation's
    /// uncaught error is recorded before the report finalizes, and
    /// finalization happens exactly once.
    ///
    /// [`StreamReport::start`]: super::StreamReport::start
    pub async fn start<T, F>(body: F) -> Self
    where
        F: AsyncFnOnce(&mut LightReport) -> SproutResult<T>,
    {
        let mut report = Self::new();

        if let Err(error) = body(&mut report).await {
            report.report_exception_once(error);
        }
        report.finalize();

        report
    }

    /// Counter-only equivalent of the streaming variant's error attribution
    pub fn report_exception_once(&mut self, error: SproutError) -> SproutError {
        if error.is_reported() {
            return error;
        }
        self.report_error(MessageName::Unnamed, &error.to_string());
        error.into_reported()
    }

    /// Freeze the counters. Idempotent; nothing is emitted.
    pub fn finalize(&mut self) {
        self.state.finalize_once();
    }
}

impl Default for LightReport {
    fn default() -> Self {
        Self::new()
    }
}

impl Report for LightReport {
    fn report_info(&mut self, _name: MessageName, _text: &str) {}

    fn report_warning(&mut self, _name: MessageName, _text: &str) {
        self.state.record_warning();
    }

    fn report_error(&mut self, _name: MessageName, _text: &str) {
        self.state.record_error();
    }

    fn report_cache_hit(&mut self, _locator: &Locator) {
        self.state.record_cache_hit();
    }

    fn report_cache_miss(&mut self, _locator: &Locator) {
        self.state.record_cache_miss();
    }

    fn has_errors(&self) -> bool {
        self.state.has_errors()
    }

    fn exit_code(&self) -> i32 {
        self.state.exit_code()
    }
}
