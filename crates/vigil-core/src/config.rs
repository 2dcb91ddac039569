//! Configuration types for Vigil observers.
//!
//! An [`ObserverConfig`] can be built in code with the `with_*` methods or
//! loaded from TOML:
//!
//! ```
//! use vigil_core::{Mode, ObserverConfig};
//!
//! let config = ObserverConfig::from_toml_str(
//!     r#"
//!     mode = "asserting"
//!     use_event_tracer = false
//!     default_timeout_secs = 0.5
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.mode, Mode::Asserting);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ObserverError, Result};
use crate::mode::Mode;

/// Configuration for an observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObserverConfig {
    /// Behavior mode for observations.
    ///
    /// Defaults to [`Mode::Reporting`].
    pub mode: Mode,

    /// Whether the observer creates its own event tracer.
    ///
    /// Ignored when a tracer is supplied explicitly. Defaults to `true`.
    pub use_event_tracer: bool,

    /// Timeout used by the `*_default` observation helpers, in seconds.
    ///
    /// Defaults to 1 second.
    pub default_timeout_secs: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Reporting,
            use_event_tracer: true,
            default_timeout_secs: 1.0,
        }
    }
}

impl ObserverConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for a reporting observer.
    pub fn reporting() -> Self {
        Self::default().with_mode(Mode::Reporting)
    }

    /// Configuration for an asserting observer.
    pub fn asserting() -> Self {
        Self::default().with_mode(Mode::Asserting)
    }

    /// Set the mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable the observer-owned event tracer.
    pub fn with_event_tracer(mut self, enabled: bool) -> Self {
        self.use_event_tracer = enabled;
        self
    }

    /// Set the default observation timeout.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout_secs = timeout.as_secs_f64();
        self
    }

    /// Get the default observation timeout.
    ///
    /// Invalid values (negative, NaN or infinite) fall back to zero; call
    /// [`validate`](Self::validate) to reject them up front.
    pub fn default_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.default_timeout_secs).unwrap_or(Duration::ZERO)
    }

    /// Check the configuration for invalid values.
    pub fn validate(&self) -> Result<()> {
        let secs = self.default_timeout_secs;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ObserverError::InvalidConfig(format!(
                "default_timeout_secs must be a positive number of seconds, got {secs}"
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| ObserverError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        tracing::debug!(mode = %config.mode, "Loaded observer configuration");
        Ok(config)
    }
}
