//! Streaming human-readable report.

use super::{format_timing, MessageName, Report, ReportState};
use crate::config::{Configuration, Style};
use crate::error::{SproutError, SproutResult};
use crate::types::Locator;
use futures::future::BoxFuture;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

/// Report variant that emits one line per message while counting.
///
/// Line format: `<glyph> SPnnnn: <indent><text>` with the glyph styled by
/// severity. Output goes to any `Write` sink so tests can capture it.
pub struct StreamReport<W: Write> {
    configuration: Arc<Configuration>,
    stdout: W,
    state: ReportState,
}

impl<W: Write> StreamReport<W> {
    pub fn new(configuration: Arc<Configuration>, stdout: W) -> Self {
        Self {
            configuration,
            stdout,
            state: ReportState::new(),
        }
    }

    /// Run entry point: construct a report, run the operation with it,
    /// record its uncaught error (if any) and finalize exactly once. The
    /// report is returned for exit-code inspection.
    pub async fn start<T, F>(configuration: Arc<Configuration>, stdout: W, body: F) -> Self
    where
        F: AsyncFnOnce(&mut StreamReport<W>) -> SproutResult<T>,
    {
        let mut report = Self::new(configuration, stdout);

        if let Err(error) = body(&mut report).await {
            report.report_exception_once(error);
        }
        report.finalize();

        report
    }

    /// Record an error on this report unless it already carries the
    /// reported marker, then return it marked. Propagating one failure
    /// through nested timer scopes therefore counts it once.
    pub fn report_exception_once(&mut self, error: SproutError) -> SproutError {
        if error.is_reported() {
            return error;
        }
        self.report_error(MessageName::Unnamed, &error.to_string());
        error.into_reported()
    }

    /// Scoped timer around a synchronous unit of work. Emits a start line,
    /// indents nested output, and emits a completion line (timed when
    /// timers are enabled) on every exit path.
    pub fn timed_sync<T, F>(&mut self, what: &str, body: F) -> SproutResult<T>
    where
        F: FnOnce(&mut Self) -> SproutResult<T>,
    {
        self.report_info(MessageName::Unnamed, &format!("┌ {}", what));
        let before = Instant::now();
        self.state.push_indent();

        let result = body(self).map_err(|error| self.report_exception_once(error));

        self.state.pop_indent();
        self.report_completion(before);
        result
    }

    /// Scoped timer around an asynchronous unit of work
    pub async fn timed<T, F>(&mut self, what: &str, body: F) -> SproutResult<T>
    where
        F: for<'a> FnOnce(&'a mut Self) -> BoxFuture<'a, SproutResult<T>>,
    {
        self.report_info(MessageName::Unnamed, &format!("┌ {}", what));
        let before = Instant::now();
        self.state.push_indent();

        let result = body(self)
            .await
            .map_err(|error| self.report_exception_once(error));

        self.state.pop_indent();
        self.report_completion(before);
        result
    }

    fn report_completion(&mut self, before: Instant) {
        if self.configuration.enable_timers() {
            let line = format!("└ Completed in {}", format_timing(before.elapsed()));
            self.report_info(MessageName::Unnamed, &line);
        } else {
            self.report_info(MessageName::Unnamed, "└ Completed");
        }
    }

    /// Emit the closing summary and freeze the counters. Idempotent.
    pub fn finalize(&mut self) {
        let mut message = self.state.install_status().to_string();

        if self.configuration.enable_timers() {
            message.push_str(&format!(" in {}", format_timing(self.state.elapsed())));
        }
        if let Some(clause) = self.state.cache_clause() {
            message.push_str(&format!(" - {}", clause));
        }

        // The summary line itself must not bump the counters it reports,
        // so the state freezes first.
        if !self.state.finalize_once() {
            return;
        }

        if self.state.has_errors() {
            self.emit(Style::RedBright, MessageName::Unnamed, &message);
        } else if self.state.warning_count() > 0 {
            self.emit(Style::YellowBright, MessageName::Unnamed, &message);
        } else {
            self.emit(Style::BlueBright, MessageName::Unnamed, &message);
        }
    }

    /// Consume the report and hand back the output sink
    pub fn into_inner(self) -> W {
        self.stdout
    }

    fn emit(&mut self, style: Style, name: MessageName, text: &str) {
        let glyph = self.configuration.format("➤", style);
        let _ = writeln!(
            self.stdout,
            "{} SP{:04}: {}{}",
            glyph,
            name.code(),
            self.state.indent_prefix(),
            text
        );
    }
}

impl<W: Write> Report for StreamReport<W> {
    fn report_info(&mut self, name: MessageName, text: &str) {
        self.emit(Style::BlueBright, name, text);
    }

    fn report_warning(&mut self, name: MessageName, text: &str) {
        self.state.record_warning();
        self.emit(Style::YellowBright, name, text);
    }

    fn report_error(&mut self, name: MessageName, text: &str) {
        self.state.record_error();
        self.emit(Style::RedBright, name, text);
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
