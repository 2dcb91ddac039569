//! PASS/FAIL report lines.

use vigil_core::{Decision, Mode, Verdict};

use crate::sink::SharedSink;

/// Render a report line: `STATUS: <operation> observed: <description>`.
pub fn format_report(verdict: Verdict, operation: &str, description: &str) -> String {
    format!("{}: {} observed: {}", verdict, operation, description)
}

/// Writes observation outcomes to a sink at the severity the mode dictates.
#[derive(Clone)]
pub struct ReportLogger {
    sink: SharedSink,
    mode: Mode,
}

impl ReportLogger {
    /// Create a report logger for the given mode.
    pub fn new(sink: SharedSink, mode: Mode) -> Self {
        Self { sink, mode }
    }

    /// Get the mode reports are logged under.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Get the underlying sink.
    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    /// Log an outcome and return the policy decision for it.
    pub fn report(&self, operation: &str, verdict: Verdict, description: &str) -> Decision {
        let decision = self.mode.decide(verdict);
        self.sink.log(
            decision.severity,
            &format_report(verdict, operation, description),
        );
        decision
    }

    /// Log a plain informational line.
    pub fn note(&self, message: &str) {
        self.sink.info(message);
    }
}

impl std::fmt::Debug for ReportLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportLogger")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
