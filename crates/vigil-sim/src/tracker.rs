//! Bookkeeping for submitted long-running commands.

use dashmap::DashMap;
use tracing::debug;

use vigil_trace::ResultCode;

/// Lifecycle status of a long-running command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    /// Accepted, not yet running.
    Queued,
    /// Running on a worker.
    InProgress,
    /// Finished with a result.
    Completed {
        /// Result code.
        code: ResultCode,
        /// Result message.
        message: String,
    },
}

impl CommandStatus {
    /// Check if the command has finished.
    pub fn is_completed(&self) -> bool {
        matches!(self, CommandStatus::Completed { .. })
    }
}

/// Tracks the status of every command a device accepted.
#[derive(Debug, Default)]
pub struct CommandTracker {
    commands: DashMap<String, CommandStatus>,
}

impl CommandTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly accepted command.
    pub fn queue(&self, command_id: &str) {
        self.commands
            .insert(command_id.to_string(), CommandStatus::Queued);
        debug!(command_id, "Command queued");
    }

    /// Mark a command as running.
    pub fn start(&self, command_id: &str) {
        self.commands
            .insert(command_id.to_string(), CommandStatus::InProgress);
        debug!(command_id, "Command in progress");
    }

    /// Record a command's result.
    pub fn complete(&self, command_id: &str, code: ResultCode, message: impl Into<String>) {
        let message = message.into();
        debug!(command_id, code = ?code, message = %message, "Command completed");
        self.commands
            .insert(command_id.to_string(), CommandStatus::Completed { code, message });
    }

    /// Get a command's status.
    pub fn status(&self, command_id: &str) -> Option<CommandStatus> {
        self.commands.get(command_id).map(|r| r.value().clone())
    }

    /// Get the number of commands still queued or running.
    pub fn pending(&self) -> usize {
        self.commands
            .iter()
            .filter(|r| !r.value().is_completed())
            .count()
    }

    /// Get the number of tracked commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands were tracked.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
