//! Vigil Sim - Simulated devices for exercising observers
//!
//! Integration tests of an observer need devices that change state and
//! complete long-running commands asynchronously. This crate provides:
//!
//! - [`PowerSwitch`]: a device with a `state` attribute and turn-on commands
//!   that complete on worker threads
//! - [`CommandTracker`]: per-command status bookkeeping
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use vigil_sim::{PowerSwitch, POWER_SWITCH_FQDN, STATE};
//! use vigil_trace::{ChangeEventTracer, DevState, EventBus, EventTracer};
//!
//! let bus = EventBus::shared();
//! let tracer = ChangeEventTracer::on_bus(&bus);
//! tracer.subscribe(POWER_SWITCH_FQDN, STATE).unwrap();
//!
//! let switch = PowerSwitch::new(Arc::clone(&bus));
//! switch.turn_on_immediately().unwrap();
//!
//! assert!(tracer
//!     .wait_for_change(POWER_SWITCH_FQDN, STATE, &DevState::On.into(), Duration::from_secs(1))
//!     .unwrap());
//! ```

pub mod device;
pub mod error;
pub mod tracker;

pub use device::{DELAYED_TURN_ON, POWER_SWITCH_FQDN, PowerSwitch, STATE};
pub use error::{SimError, SimResult};
pub use tracker::{CommandStatus, CommandTracker};
