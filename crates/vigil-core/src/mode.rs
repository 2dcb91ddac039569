//! Observation modes and the policy that maps verdicts to consequences.
//!
//! Every observation ends in a [`Verdict`]. The observer's [`Mode`] decides
//! what that verdict means: how loudly it is logged and whether a failure is
//! turned into an error for the caller. All of that logic lives here so the
//! observer consults it exactly once per call.

use serde::{Deserialize, Serialize};

/// Behavior mode of an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Only report observations; failures never propagate.
    #[default]
    Reporting,
    /// Report observations and raise on every failure.
    Asserting,
}

impl Mode {
    /// Get the mode name as used in log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Reporting => "REPORTING",
            Mode::Asserting => "ASSERTING",
        }
    }

    /// Severity to log an outcome at.
    pub fn severity(self, passed: bool) -> Severity {
        match (passed, self) {
            (true, _) => Severity::Info,
            (false, Mode::Reporting) => Severity::Warning,
            (false, Mode::Asserting) => Severity::Error,
        }
    }

    /// Whether an outcome must be raised as an error.
    pub fn must_raise(self, passed: bool) -> bool {
        !passed && self == Mode::Asserting
    }

    /// Apply the policy to a verdict.
    pub fn decide(self, verdict: Verdict) -> Decision {
        let passed = verdict.is_pass();
        Decision {
            severity: self.severity(passed),
            raise: self.must_raise(passed),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary outcome of a single observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The observed condition held.
    Pass,
    /// The observed condition did not hold.
    Fail,
}

impl Verdict {
    /// Build a verdict from a boolean condition.
    pub fn from_passed(passed: bool) -> Self {
        if passed { Verdict::Pass } else { Verdict::Fail }
    }

    /// Check if the verdict is a pass.
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Check if the verdict is a failure.
    pub fn is_fail(&self) -> bool {
        !self.is_pass()
    }

    /// Get the status label used in report lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log severity for a reported outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational.
    Info,
    /// Warning.
    Warning,
    /// Error.
    Error,
}

impl Severity {
    /// Get the severity name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the policy decided for one verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Severity to log at.
    pub severity: Severity,
    /// Whether the caller must receive an error.
    pub raise: bool,
}
