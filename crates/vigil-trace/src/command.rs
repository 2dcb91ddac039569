//! Long-running command protocol types.
//!
//! A long-running command returns a [`CommandHandle`] as soon as it is
//! queued. Its outcome arrives later as a change of the
//! [`LONG_RUNNING_COMMAND_RESULT`] attribute whose value is an
//! [`AttributeValue::CommandResult`] carrying the command's tracking id and a
//! `[result_code, message]` payload.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::event::AttributeValue;

/// Attribute that long-running command results are published on.
pub const LONG_RUNNING_COMMAND_RESULT: &str = "longRunningCommandResult";

/// Result codes reported by long-running commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i64)]
pub enum ResultCode {
    /// The command completed successfully.
    Ok = 0,
    /// The command has started.
    Started = 1,
    /// The command is queued for execution.
    Queued = 2,
    /// The command failed.
    Failed = 3,
    /// The outcome is unknown.
    Unknown = 4,
    /// The command was rejected.
    Rejected = 5,
    /// The command is not allowed in the current state.
    NotAllowed = 6,
    /// The command was aborted.
    Aborted = 7,
}

impl ResultCode {
    /// Get the numeric code.
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for ResultCode {
    type Error = i64;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => ResultCode::Ok,
            1 => ResultCode::Started,
            2 => ResultCode::Queued,
            3 => ResultCode::Failed,
            4 => ResultCode::Unknown,
            5 => ResultCode::Rejected,
            6 => ResultCode::NotAllowed,
            7 => ResultCode::Aborted,
            other => return Err(other),
        })
    }
}

/// Handle returned when a long-running command is submitted.
///
/// Shaped as a pair of sequences: result codes and strings. The first string
/// is the command's tracking id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandHandle {
    /// Result codes reported at submission.
    pub codes: Vec<i64>,
    /// Strings reported at submission; the first is the tracking id.
    pub strings: Vec<String>,
}

impl CommandHandle {
    /// Create a handle from raw sequences.
    pub fn new(codes: Vec<i64>, strings: Vec<String>) -> Self {
        Self { codes, strings }
    }

    /// Create the handle of a freshly submitted command.
    pub fn submitted(code: ResultCode, command_id: impl Into<String>) -> Self {
        Self::new(vec![code.code()], vec![command_id.into()])
    }

    /// Get the command's tracking id.
    pub fn tracking_id(&self) -> Option<&str> {
        self.strings.first().map(String::as_str)
    }

    /// Get the result code reported at submission.
    pub fn result_code(&self) -> Option<ResultCode> {
        self.codes
            .first()
            .and_then(|code| ResultCode::try_from(*code).ok())
    }
}

/// Message reported by a command that completed successfully.
pub fn completed_ok_message(command_name: &str) -> String {
    format!("{} completed OK", command_name)
}

/// Build a `[result_code, message]` payload.
pub fn result_payload(code: ResultCode, message: &str) -> serde_json::Value {
    json!([code.code(), message])
}

impl AttributeValue {
    /// Value of a long-running command result.
    pub fn command_result(command_id: impl Into<String>, code: ResultCode, message: &str) -> Self {
        AttributeValue::CommandResult {
            command_id: command_id.into(),
            payload: result_payload(code, message),
        }
    }

    /// Value of a long-running command that completed OK.
    pub fn command_completed_ok(command_id: impl Into<String>, command_name: &str) -> Self {
        Self::command_result(
            command_id,
            ResultCode::Ok,
            &completed_ok_message(command_name),
        )
    }
}
