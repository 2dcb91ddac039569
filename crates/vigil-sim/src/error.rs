//! Error types for simulated devices.

use thiserror::Error;

/// Errors from simulated devices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The device has no command with this name.
    #[error("Unknown command: '{0}'")]
    UnknownCommand(String),

    /// The device was shut down and no longer accepts commands.
    #[error("Device '{0}' is shut down")]
    ShutDown(String),
}

/// Result type for simulated device operations.
pub type SimResult<T> = std::result::Result<T, SimError>;
