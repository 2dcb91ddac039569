//! Error types for event tracing.

use thiserror::Error;

/// Errors reported by event tracers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TracerError {
    /// A query was made for a pair the tracer is not subscribed to.
    #[error("Not subscribed to {device}: {attribute}")]
    NotSubscribed {
        /// Device name.
        device: String,
        /// Attribute name.
        attribute: String,
    },

    /// The timeout cannot be represented as a deadline.
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    /// The event source backing the tracer is gone.
    #[error("Event source disconnected")]
    Disconnected,
}

/// Result type for tracer operations.
pub type TraceResult<T> = std::result::Result<T, TracerError>;
