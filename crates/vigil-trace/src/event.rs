//! Attribute values and change events.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Operational state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DevState {
    /// Powered on.
    On,
    /// Powered off.
    Off,
    /// Closed, for valve-like devices.
    Close,
    /// Open, for valve-like devices.
    Open,
    /// Inserted into the beam or signal path.
    Insert,
    /// Extracted from the beam or signal path.
    Extract,
    /// Moving between positions.
    Moving,
    /// Idle and ready.
    Standby,
    /// Failed; needs intervention.
    Fault,
    /// Initialising.
    Init,
    /// Executing work.
    Running,
    /// Running with an alarm raised.
    Alarm,
    /// Administratively disabled.
    Disable,
    /// State cannot be determined.
    Unknown,
}

impl DevState {
    /// Get the state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DevState::On => "ON",
            DevState::Off => "OFF",
            DevState::Close => "CLOSE",
            DevState::Open => "OPEN",
            DevState::Insert => "INSERT",
            DevState::Extract => "EXTRACT",
            DevState::Moving => "MOVING",
            DevState::Standby => "STANDBY",
            DevState::Fault => "FAULT",
            DevState::Init => "INIT",
            DevState::Running => "RUNNING",
            DevState::Alarm => "ALARM",
            DevState::Disable => "DISABLE",
            DevState::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for DevState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value carried by an attribute change event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Boolean attribute.
    Bool(bool),
    /// Integer attribute.
    Int(i64),
    /// Floating point attribute.
    Float(f64),
    /// String attribute.
    Str(String),
    /// Device state attribute.
    State(DevState),
    /// Result of a long-running command.
    CommandResult {
        /// Tracking identifier of the command.
        command_id: String,
        /// Result body, conventionally `[result_code, message]`.
        payload: serde_json::Value,
    },
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Str(v) => write!(f, "{}", v),
            AttributeValue::State(v) => write!(f, "{}", v),
            AttributeValue::CommandResult {
                command_id,
                payload,
            } => write!(f, "({}, {})", command_id, payload),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Str(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Str(v)
    }
}

impl From<DevState> for AttributeValue {
    fn from(v: DevState) -> Self {
        AttributeValue::State(v)
    }
}

/// Identifies one attribute of one device.
///
/// Device and attribute names are case-insensitive; keys are stored
/// lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeKey {
    device: String,
    attribute: String,
}

impl AttributeKey {
    /// Create a key, normalizing case.
    pub fn new(device: &str, attribute: &str) -> Self {
        Self {
            device: device.to_ascii_lowercase(),
            attribute: attribute.to_ascii_lowercase(),
        }
    }

    /// Get the normalized device name.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Get the normalized attribute name.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl std::fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.device, self.attribute)
    }
}

/// A change of one attribute's value on one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Device name as published.
    pub device: String,
    /// Attribute name as published.
    pub attribute: String,
    /// The new value.
    pub value: AttributeValue,
    /// When the change was published.
    pub timestamp: SystemTime,
}

impl ChangeEvent {
    /// Create a change event stamped with the current time.
    pub fn new(
        device: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            device: device.into(),
            attribute: attribute.into(),
            value: value.into(),
            timestamp: SystemTime::now(),
        }
    }

    /// Get the normalized key of this event.
    pub fn key(&self) -> AttributeKey {
        AttributeKey::new(&self.device, &self.attribute)
    }

    /// Check if this event is a change of `key` to `expected`.
    pub fn matches(&self, key: &AttributeKey, expected: &AttributeValue) -> bool {
        self.value == *expected && self.key() == *key
    }
}
