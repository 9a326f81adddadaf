// ABOUTME: Emits a LoadReport to operators via tracing or any io::Write sink
// ABOUTME: Reporting never fails the load; sink errors are logged and dropped

use crate::outcome::{LoadOutcome, LoadReport};
use std::io::Write;
use std::sync::Mutex;

/// Sink for finished load reports
pub trait Reporter: Send + Sync {
    fn emit(&self, report: &LoadReport);
}

/// "3/4 cogs loaded (1 failed)"
pub fn format_summary(report: &LoadReport) -> String {
    let mut summary = format!("{}/{} cogs loaded", report.succeeded(), report.total());
    if report.failed() > 0 {
        summary.push_str(&format!(" ({} failed)", report.failed()));
    }
    summary
}

/// One line per outcome, with the trace indented beneath failures when present
pub fn format_entry(outcome: &LoadOutcome) -> String {
    match outcome {
        LoadOutcome::Success {
            name,
            commands_added,
            hooks_added,
            elapsed,
        } => format!(
            "  loaded  {} ({} commands, {} hooks, {}ms)",
            name,
            commands_added,
            hooks_added,
            elapsed.as_millis()
        ),
        LoadOutcome::Failure {
            name,
            category,
            message,
            trace,
            ..
        } => {
            let mut line = format!("  failed  {} [{}] {}", name, category, message);
            if let Some(trace) = trace {
                for trace_line in trace.lines() {
                    line.push_str("\n      ");
                    line.push_str(trace_line);
                }
            }
            line
        }
    }
}

/// Full multi-line rendering of a report
pub fn format_report(report: &LoadReport) -> String {
    let mut text = format_summary(report);
    for entry in report.entries() {
        text.push('\n');
        text.push_str(&format_entry(entry));
    }
    text
}

/// Reports through structured tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn emit(&self, report: &LoadReport) {
        for entry in report.entries() {
            match entry {
                LoadOutcome::Success {
                    name,
                    commands_added,
                    hooks_added,
                    elapsed,
                } => tracing::info!(
                    cog = %name,
                    status = "loaded",
                    commands = commands_added,
                    hooks = hooks_added,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Cog loaded"
                ),
                LoadOutcome::Failure {
                    name,
                    category,
                    message,
                    trace: Some(trace),
                    ..
                } => tracing::error!(
                    cog = %name,
                    status = "failed",
                    category = %category,
                    error = %message,
                    trace = %trace,
                    "Cog failed to load"
                ),
                LoadOutcome::Failure {
                    name,
                    category,
                    message,
                    trace: None,
                    ..
                } => tracing::error!(
                    cog = %name,
                    status = "failed",
                    category = %category,
                    error = %message,
                    "Cog failed to load"
                ),
            }
        }

        if report.all_loaded() {
            tracing::info!(
                total = report.total(),
                succeeded = report.succeeded(),
                "{}",
                format_summary(report)
            );
        } else {
            tracing::warn!(
                total = report.total(),
                succeeded = report.succeeded(),
                failed = report.failed(),
                "{}",
                format_summary(report)
            );
        }
    }
}

/// Writes the human-readable report to a writer (stdout, a file, a buffer)
pub struct WriterReporter<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn try_emit(&self, report: &LoadReport) -> std::io::Result<()> {
        let mut writer = match self.writer.lock() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(writer, "{}", format_report(report))?;
        writer.flush()
    }
}

impl<W: Write + Send> Reporter for WriterReporter<W> {
    fn emit(&self, report: &LoadReport) {
        if let Err(e) = self.try_emit(report) {
            tracing::warn!(error = %e, "Failed to write load report");
        }
    }
}

/// Emits to several reporters in order
#[derive(Default)]
pub struct FanoutReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl FanoutReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }
}

impl Reporter for FanoutReporter {
    fn emit(&self, report: &LoadReport) {
        for reporter in &self.reporters {
            reporter.emit(report);
        }
    }
}
