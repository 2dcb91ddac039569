//! Error types for Vigil observers.
//!
//! Two kinds of failure reach callers. Configuration errors (no tracer,
//! bad config) are always returned regardless of mode. Observation failures
//! are only returned by observers in [`Mode::Asserting`](crate::Mode).

use thiserror::Error;

/// Errors returned by observer operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObserverError {
    /// A tracer-dependent operation was called with no tracer attached.
    #[error("No event tracer associated with observer")]
    NoTracer,

    /// An observation failed while asserting.
    #[error("{operation} failed: {description}")]
    ObservationFailed {
        /// Name of the observation operation.
        operation: String,
        /// The same description that was logged.
        description: String,
    },

    /// Invalid observer configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The attached tracer rejected a subscription request.
    #[error("Tracer error: {0}")]
    Tracer(String),
}

impl ObserverError {
    /// Check if this is an assertion-style observation failure.
    pub fn is_observation_failure(&self) -> bool {
        matches!(self, ObserverError::ObservationFailed { .. })
    }

    /// Check if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ObserverError::NoTracer | ObserverError::InvalidConfig(_)
        )
    }
}

/// Result type alias for observer operations.
pub type Result<T> = std::result::Result<T, ObserverError>;
