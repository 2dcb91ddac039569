//! Simulated power switch device.
//!
//! The switch has a single `state` attribute (OFF or ON). Turning it off is
//! a plain command; turning it on is a long-running command that returns a
//! [`CommandHandle`] immediately and completes on a worker thread, publishing
//! the new state and then the command result on the device's [`EventBus`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use vigil_trace::{
    AttributeValue, ChangeEvent, CommandHandle, DevState, EventBus, LONG_RUNNING_COMMAND_RESULT,
    ResultCode, completed_ok_message,
};

use crate::error::{SimError, SimResult};
use crate::tracker::{CommandStatus, CommandTracker};

/// Default device name of the simulated power switch.
pub const POWER_SWITCH_FQDN: &str = "test/device/power_switch";

/// Name of the `state` attribute.
pub const STATE: &str = "state";

/// Delay used by the `TurnOnAfter0p3Seconds` command.
pub const DELAYED_TURN_ON: Duration = Duration::from_millis(300);

/// A simulated power switch.
pub struct PowerSwitch {
    name: String,
    bus: Arc<EventBus>,
    state: Arc<RwLock<DevState>>,
    tracker: Arc<CommandTracker>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    shut_down: AtomicBool,
}

impl PowerSwitch {
    /// Create a switch named [`POWER_SWITCH_FQDN`], initially OFF.
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self::named(POWER_SWITCH_FQDN, bus)
    }

    /// Create a switch with a custom name, initially OFF.
    pub fn named(name: impl Into<String>, bus: Arc<EventBus>) -> Self {
        let name = name.into();
        info!(device = %name, "Simulated power switch created");
        Self {
            name,
            bus,
            state: Arc::new(RwLock::new(DevState::Off)),
            tracker: Arc::new(CommandTracker::new()),
            workers: Mutex::new(Vec::new()),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current state.
    pub fn state(&self) -> DevState {
        *self.state.read()
    }

    /// Get the command tracker.
    pub fn tracker(&self) -> &CommandTracker {
        &self.tracker
    }

    /// Get the status of a submitted command.
    pub fn command_status(&self, handle: &CommandHandle) -> Option<CommandStatus> {
        handle
            .tracking_id()
            .and_then(|id| self.tracker.status(id))
    }

    /// Turn the switch off immediately.
    pub fn turn_off(&self) {
        *self.state.write() = DevState::Off;
        self.bus
            .publish(ChangeEvent::new(self.name.as_str(), STATE, DevState::Off));
    }

    /// Submit `TurnOnImmediately`.
    pub fn turn_on_immediately(&self) -> SimResult<CommandHandle> {
        self.submit_turn_on("TurnOnImmediately", Duration::ZERO)
    }

    /// Submit `TurnOnAfter0p3Seconds`.
    pub fn turn_on_after_0p3_seconds(&self) -> SimResult<CommandHandle> {
        self.submit_turn_on("TurnOnAfter0p3Seconds", DELAYED_TURN_ON)
    }

    /// Invoke a command by name.
    ///
    /// `TurnOff` is synchronous and returns an `OK` handle with an empty id.
    pub fn invoke(&self, command_name: &str) -> SimResult<CommandHandle> {
        match command_name {
            "TurnOff" => {
                self.ensure_running()?;
                self.turn_off();
                Ok(CommandHandle::new(vec![ResultCode::Ok.code()], Vec::new()))
            }
            "TurnOnImmediately" => self.turn_on_immediately(),
            "TurnOnAfter0p3Seconds" => self.turn_on_after_0p3_seconds(),
            other => Err(SimError::UnknownCommand(other.to_string())),
        }
    }

    /// Stop accepting commands and wait for running ones to finish.
    pub fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
        let workers: Vec<_> = self.workers.lock().drain(..).collect();
        for worker in workers {
            if worker.join().is_err() {
                warn!(device = %self.name, "Command worker panicked");
            }
        }
    }

    fn ensure_running(&self) -> SimResult<()> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(SimError::ShutDown(self.name.clone()));
        }
        Ok(())
    }

    fn submit_turn_on(&self, command_name: &'static str, delay: Duration) -> SimResult<CommandHandle> {
        self.ensure_running()?;

        let command_id = format!("{}_{}", Uuid::new_v4(), command_name);
        self.tracker.queue(&command_id);

        let name = self.name.clone();
        let bus = Arc::clone(&self.bus);
        let state = Arc::clone(&self.state);
        let tracker = Arc::clone(&self.tracker);
        let id = command_id.clone();

        let worker = thread::spawn(move || {
            tracker.start(&id);
            if !delay.is_zero() {
                thread::sleep(delay);
            }

            *state.write() = DevState::On;
            bus.publish(ChangeEvent::new(name.as_str(), STATE, DevState::On));

            let message = completed_ok_message(command_name);
            tracker.complete(&id, ResultCode::Ok, message.as_str());
            bus.publish(ChangeEvent::new(
                name.as_str(),
                LONG_RUNNING_COMMAND_RESULT,
                AttributeValue::command_result(id.as_str(), ResultCode::Ok, &message),
            ));
        });

        let mut workers = self.workers.lock();
        workers.retain(|w| !w.is_finished());
        workers.push(worker);

        Ok(CommandHandle::submitted(ResultCode::Queued, command_id))
    }
}

impl Drop for PowerSwitch {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for PowerSwitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerSwitch")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("pending_commands", &self.tracker.pending())
            .finish()
    }
}
