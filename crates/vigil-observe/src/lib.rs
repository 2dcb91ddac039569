//! Vigil Observe - Report logging
//!
//! This crate turns observation outcomes into log lines:
//!
//! - [`LogSink`]: the leveled sink observers write to
//! - [`TracingSink`]: forwards lines to `tracing`
//! - [`CollectingSink`]: keeps lines in memory for tests
//! - [`ReportLogger`]: renders `STATUS: <operation> observed: <description>`
//!   at the severity the observer's mode dictates
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use vigil_core::{Mode, Severity, Verdict};
//! use vigil_observe::{CollectingSink, ReportLogger};
//!
//! let sink = Arc::new(CollectingSink::default());
//! let logger = ReportLogger::new(sink.clone(), Mode::Reporting);
//!
//! logger.report("Observer.observe_true", Verdict::Fail, "false");
//! assert_eq!(sink.last().unwrap().severity, Severity::Warning);
//! ```

pub mod logging;
pub mod report;
pub mod sink;

// Re-export main types
pub use logging::{init_logging, init_test_logging};
pub use report::{ReportLogger, format_report};
pub use sink::{CollectingSink, LogRecord, LogSink, SharedSink, TracingSink};
