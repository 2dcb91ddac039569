//! Outcome of a single observation call.

use crate::mode::Verdict;

/// The verdict of one observation and what was observed.
///
/// Returned by every observer call that does not raise. Callers in reporting
/// mode should inspect [`verdict`](Self::verdict): a returned observation is
/// not necessarily a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Name of the observation operation.
    pub operation: &'static str,
    /// PASS or FAIL.
    pub verdict: Verdict,
    /// Human-readable description, as logged.
    pub description: String,
}

impl Observation {
    /// Create an observation.
    pub fn new(operation: &'static str, verdict: Verdict, description: impl Into<String>) -> Self {
        Self {
            operation,
            verdict,
            description: description.into(),
        }
    }

    /// Check if the observation passed.
    pub fn is_pass(&self) -> bool {
        self.verdict.is_pass()
    }

    /// Check if the observation failed.
    pub fn is_fail(&self) -> bool {
        self.verdict.is_fail()
    }
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} observed: {}", self.verdict, self.operation, self.description)
    }
}
