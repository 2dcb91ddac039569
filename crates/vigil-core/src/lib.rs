//! Vigil Core - Observation policy and configuration
//!
//! This crate holds the pieces of the Vigil observation harness that do not
//! depend on logging or event delivery:
//!
//! - [`Mode`]: whether an observer only reports or also asserts
//! - [`Verdict`] and [`Severity`]: the outcome of an observation and how
//!   loudly it is logged
//! - [`Mode::decide`]: the single policy function mapping a verdict to a
//!   [`Decision`]
//! - [`ObserverConfig`]: observer configuration, loadable from TOML
//! - [`Observation`]: the verdict and description of one observation call
//! - [`ObserverError`]: the error type returned by observer operations
//!
//! # Example
//!
//! ```
//! use vigil_core::{Mode, Severity, Verdict};
//!
//! let decision = Mode::Reporting.decide(Verdict::Fail);
//! assert_eq!(decision.severity, Severity::Warning);
//! assert!(!decision.raise);
//! ```

pub mod config;
pub mod error;
pub mod mode;
pub mod observation;

// Re-export main types at crate root
pub use config::ObserverConfig;
pub use error::{ObserverError, Result};
pub use mode::{Decision, Mode, Severity, Verdict};
pub use observation::Observation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::ObserverConfig;
    pub use crate::error::{ObserverError, Result};
    pub use crate::mode::{Mode, Severity, Verdict};
    pub use crate::observation::Observation;
}
