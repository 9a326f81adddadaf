// ABOUTME: Per-cog load outcomes and the aggregate load report
// ABOUTME: Outcomes are immutable values; the report is finalized once per orchestration pass

use crate::descriptor::LoadState;
use std::fmt;
use std::time::Duration;

/// Why a cog failed to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    /// Manifest unreadable/invalid, unknown cog kind, or factory error
    Import,
    /// The cog's setup returned an error or panicked
    Setup,
    /// The cog's setup did not finish before the deadline
    Timeout,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::Import => "ImportError",
            FailureCategory::Setup => "SetupError",
            FailureCategory::Timeout => "Timeout",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of attempting to load one cog
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Success {
        name: String,
        /// Commands the cog registered
        commands_added: usize,
        /// Event hooks the cog registered
        hooks_added: usize,
        elapsed: Duration,
    },
    Failure {
        name: String,
        category: FailureCategory,
        /// One-line error message including its cause chain, never empty
        message: String,
        /// Full error chain / backtrace. Dropped unless the pass ran in debug mode.
        trace: Option<String>,
        elapsed: Duration,
    },
}

impl LoadOutcome {
    /// Build a failure from an error. The message is the one-line cause chain;
    /// the trace is the full debug rendering (including any captured backtrace).
    pub fn failure(
        name: impl Into<String>,
        category: FailureCategory,
        error: &anyhow::Error,
        elapsed: Duration,
    ) -> Self {
        Self::failure_with_trace(
            name,
            category,
            format!("{:#}", error),
            Some(format!("{:?}", error)),
            elapsed,
        )
    }

    pub fn failure_with_trace(
        name: impl Into<String>,
        category: FailureCategory,
        message: impl Into<String>,
        trace: Option<String>,
        elapsed: Duration,
    ) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = format!("{} with no message", category);
        }
        LoadOutcome::Failure {
            name: name.into(),
            category,
            message,
            trace,
            elapsed,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            LoadOutcome::Success { name, .. } | LoadOutcome::Failure { name, .. } => name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoadOutcome::Success { .. })
    }

    pub fn state(&self) -> LoadState {
        if self.is_success() {
            LoadState::Succeeded
        } else {
            LoadState::Failed
        }
    }

    pub fn category(&self) -> Option<FailureCategory> {
        match self {
            LoadOutcome::Failure { category, .. } => Some(*category),
            LoadOutcome::Success { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadOutcome::Failure { message, .. } => Some(message),
            LoadOutcome::Success { .. } => None,
        }
    }

    pub fn trace(&self) -> Option<&str> {
        match self {
            LoadOutcome::Failure { trace, .. } => trace.as_deref(),
            LoadOutcome::Success { .. } => None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            LoadOutcome::Success { elapsed, .. } | LoadOutcome::Failure { elapsed, .. } => {
                *elapsed
            }
        }
    }

    /// Same outcome without trace detail
    pub fn into_terse(self) -> Self {
        match self {
            LoadOutcome::Failure {
                name,
                category,
                message,
                elapsed,
                ..
            } => LoadOutcome::Failure {
                name,
                category,
                message,
                trace: None,
                elapsed,
            },
            success => success,
        }
    }
}

/// Aggregate result of one orchestration pass, in load order
#[derive(Debug, Clone)]
pub struct LoadReport {
    entries: Vec<LoadOutcome>,
    succeeded: usize,
    failed: usize,
    debug: bool,
}

impl LoadReport {
    pub fn builder(debug: bool) -> LoadReportBuilder {
        LoadReportBuilder {
            entries: Vec::new(),
            debug,
        }
    }

    pub fn entries(&self) -> &[LoadOutcome] {
        &self.entries
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Whether entries carry full trace detail
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn all_loaded(&self) -> bool {
        self.failed == 0
    }

    pub fn entry(&self, name: &str) -> Option<&LoadOutcome> {
        self.entries.iter().find(|e| e.name() == name)
    }

    pub fn successes(&self) -> impl Iterator<Item = &LoadOutcome> {
        self.entries.iter().filter(|e| e.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &LoadOutcome> {
        self.entries.iter().filter(|e| !e.is_success())
    }
}

/// Accumulates outcomes during a pass; `finish` freezes them into a report
#[derive(Debug)]
pub struct LoadReportBuilder {
    entries: Vec<LoadOutcome>,
    debug: bool,
}

impl LoadReportBuilder {
    /// Record one outcome; failures are made terse unless building in debug mode
    pub fn push(&mut self, outcome: LoadOutcome) {
        let outcome = if self.debug {
            outcome
        } else {
            outcome.into_terse()
        };
        self.entries.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> LoadReport {
        let succeeded = self.entries.iter().filter(|e| e.is_success()).count();
        let failed = self.entries.len() - succeeded;
        LoadReport {
            entries: self.entries,
            succeeded,
            failed,
            debug: self.debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(name: &str) -> LoadOutcome {
        LoadOutcome::Success {
            name: name.to_string(),
            commands_added: 1,
            hooks_added: 0,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_failure_message_never_empty() {
        let outcome = LoadOutcome::failure_with_trace(
            "quiet",
            FailureCategory::Setup,
            "  ",
            None,
            Duration::ZERO,
        );
        assert_eq!(outcome.message(), Some("SetupError with no message"));
    }

    #[test]
    fn test_failure_trace_includes_cause_chain() {
        let err = anyhow::anyhow!("disk on fire").context("loading config");
        let outcome =
            LoadOutcome::failure("cfg", FailureCategory::Import, &err, Duration::ZERO);
        assert_eq!(outcome.message(), Some("loading config: disk on fire"));
        let trace = outcome.trace().unwrap();
        assert!(trace.contains("loading config"));
        assert!(trace.contains("disk on fire"));
    }

    #[test]
    fn test_builder_counts_and_terse_mode() {
        let err = anyhow::anyhow!("boom");
        let mut builder = LoadReport::builder(false);
        builder.push(success("a"));
        builder.push(LoadOutcome::failure(
            "b",
            FailureCategory::Setup,
            &err,
            Duration::ZERO,
        ));
        builder.push(success("c"));
        let report = builder.finish();

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_loaded());
        assert_eq!(report.entry("b").unwrap().trace(), None);
        let names: Vec<_> = report.entries().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(FailureCategory::Import.to_string(), "ImportError");
        assert_eq!(FailureCategory::Setup.to_string(), "SetupError");
        assert_eq!(FailureCategory::Timeout.to_string(), "Timeout");
    }
}
