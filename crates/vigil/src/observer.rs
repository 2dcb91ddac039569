//! The observation engine.
//!
//! An [`Observer`] checks conditions in test code and reports each outcome as
//! PASS or FAIL. What happens on FAIL depends on its [`Mode`]:
//!
//! - [`Mode::Reporting`]: the failure is logged at warning level and the call
//!   returns `Ok` with a failing [`Observation`]
//! - [`Mode::Asserting`]: the failure is logged at error level and the call
//!   returns [`ObserverError::ObservationFailed`]
//!
//! Attribute-change and long-running-command observations wait on the
//! attached [`EventTracer`](vigil_trace::EventTracer) for at most the given
//! timeout. Without a tracer they return [`ObserverError::NoTracer`] in both
//! modes.

use std::fmt::Debug;
use std::time::Duration;

use tracing::debug;

use vigil_core::{Mode, Observation, ObserverError, Result, Verdict};
use vigil_observe::{ReportLogger, SharedSink};
use vigil_trace::{
    AttributeValue, CommandHandle, LONG_RUNNING_COMMAND_RESULT, ResultCode, SharedTracer,
    completed_ok_message, result_payload,
};

use crate::builder::ObserverBuilder;
use crate::subscriptions::Subscriptions;

const OBSERVE_TRUE: &str = "Observer.observe_true";
const OBSERVE_FALSE: &str = "Observer.observe_false";
const OBSERVE_EQUALITY: &str = "Observer.observe_equality";
const OBSERVE_ATTRIBUTE_CHANGE: &str = "Observer.observe_attribute_change";
const OBSERVE_LRC_RESULT: &str = "Observer.observe_long_running_command_result";

/// Observes values and device events, reporting or asserting on them.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vigil::prelude::*;
///
/// let sink = Arc::new(CollectingSink::default());
/// let observer = Observer::new(Mode::Asserting, sink.clone());
///
/// assert!(observer.observe_true(true).is_ok());
/// assert!(observer.observe_equality(2, 1).is_err());
/// ```
pub struct Observer {
    mode: Mode,
    logger: ReportLogger,
    subscriptions: Subscriptions,
    default_timeout: Duration,
}

impl Observer {
    /// Default timeout for the `*_default` observations.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

    /// Create an observer with no tracer attached.
    pub fn new(mode: Mode, sink: SharedSink) -> Self {
        Self::from_parts(mode, sink, Self::DEFAULT_TIMEOUT, Subscriptions::new)
    }

    /// Create an observer with a caller-supplied `tracer` attached.
    ///
    /// The tracer stays the caller's: dropping the observer leaves its
    /// subscriptions in place.
    pub fn with_tracer(mode: Mode, sink: SharedSink, tracer: SharedTracer) -> Self {
        Self::from_parts(mode, sink, Self::DEFAULT_TIMEOUT, |logger| {
            Subscriptions::with_tracer(logger, Some(tracer))
        })
    }

    /// Create an observer builder.
    pub fn builder() -> ObserverBuilder {
        ObserverBuilder::new()
    }

    pub(crate) fn from_parts(
        mode: Mode,
        sink: SharedSink,
        default_timeout: Duration,
        subscriptions: impl FnOnce(ReportLogger) -> Subscriptions,
    ) -> Self {
        let logger = ReportLogger::new(sink, mode);
        logger.note(&format!("Observer instantiated in mode: {}", mode));
        Self {
            mode,
            subscriptions: subscriptions(logger.clone()),
            logger,
            default_timeout,
        }
    }

    /// Get the observer's mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Get the timeout used by the `*_default` observations.
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Get the attached tracer, if any.
    pub fn tracer(&self) -> Option<&SharedTracer> {
        self.subscriptions.tracer().ok()
    }

    /// Check if a tracer is attached.
    pub fn has_tracer(&self) -> bool {
        self.subscriptions.is_attached()
    }

    /// Get the subscription manager.
    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    // Subscription lifecycle

    /// Attach a tracer, returning the one it replaces.
    pub fn attach_tracer(&mut self, tracer: SharedTracer) -> Option<SharedTracer> {
        self.subscriptions.attach(tracer)
    }

    /// Detach the tracer without unsubscribing it.
    pub fn detach_tracer(&mut self) -> Option<SharedTracer> {
        self.subscriptions.detach()
    }

    /// Subscribe the attached tracer to `attribute` on `device`.
    pub fn subscribe(&self, device: &str, attribute: &str) -> Result<()> {
        self.subscriptions.subscribe(device, attribute)
    }

    /// Discard events captured so far.
    pub fn clear_events(&self) -> Result<()> {
        self.subscriptions.clear_events()
    }

    /// Clear events and release all subscriptions of the attached tracer.
    pub fn reset_tracer(&self) -> Result<()> {
        self.subscriptions.reset()
    }

    /// Release the attached tracer's subscriptions and detach it.
    ///
    /// Called by fixture teardown. Dropping the observer does the same for a
    /// tracer it created, and only detaches a caller-supplied one.
    pub fn dispose(&mut self) {
        self.subscriptions.dispose();
    }

    // Observations

    /// Observe that `value` is true.
    pub fn observe_true(&self, value: bool) -> Result<Observation> {
        self.conclude(OBSERVE_TRUE, Verdict::from_passed(value), value.to_string())
    }

    /// Observe that `value` is false.
    pub fn observe_false(&self, value: bool) -> Result<Observation> {
        self.conclude(OBSERVE_FALSE, Verdict::from_passed(!value), value.to_string())
    }

    /// Observe that `a` equals `b`.
    pub fn observe_equality<A, B>(&self, a: A, b: B) -> Result<Observation>
    where
        A: PartialEq<B> + Debug,
        B: Debug,
    {
        if a == b {
            self.conclude(OBSERVE_EQUALITY, Verdict::Pass, format!("{:?} == {:?}", a, b))
        } else {
            self.conclude(OBSERVE_EQUALITY, Verdict::Fail, format!("{:?} =/= {:?}", a, b))
        }
    }

    /// Observe a change of `attribute` on `device` to `expected` within
    /// `timeout`.
    ///
    /// Requires the attached tracer to be subscribed to the pair. Blocks for
    /// at most `timeout`.
    pub fn observe_attribute_change(
        &self,
        device: &str,
        attribute: &str,
        expected: impl Into<AttributeValue>,
        timeout: Duration,
    ) -> Result<Observation> {
        let tracer = self.subscriptions.tracer()?;
        let expected = expected.into();
        let detail = format!(
            "device: {} | attribute: {} | target value: {} | within timeout: {}s",
            device,
            attribute,
            expected,
            timeout.as_secs_f64()
        );
        self.await_change(
            tracer,
            OBSERVE_ATTRIBUTE_CHANGE,
            device,
            attribute,
            &expected,
            timeout,
            &detail,
        )
    }

    /// [`observe_attribute_change`](Self::observe_attribute_change) with the
    /// default timeout.
    pub fn observe_attribute_change_default(
        &self,
        device: &str,
        attribute: &str,
        expected: impl Into<AttributeValue>,
    ) -> Result<Observation> {
        self.observe_attribute_change(device, attribute, expected, self.default_timeout)
    }

    /// Observe that the long-running command behind `handle` completed OK on
    /// `device` within `timeout`.
    ///
    /// Passes when the device's `longRunningCommandResult` changes to the
    /// command's tracking id paired with `[0, "<command_name> completed OK"]`.
    /// Requires the attached tracer to be subscribed to that attribute.
    pub fn observe_long_running_command_result(
        &self,
        device: &str,
        handle: &CommandHandle,
        command_name: &str,
        timeout: Duration,
    ) -> Result<Observation> {
        let tracer = self.subscriptions.tracer()?;
        let message = completed_ok_message(command_name);

        let Some(command_id) = handle.tracking_id() else {
            return self.conclude(
                OBSERVE_LRC_RESULT,
                Verdict::Fail,
                format!(
                    "did not capture (device: {} | command: {} | no tracking id in handle {:?})",
                    device, command_name, handle
                ),
            );
        };

        let expected = AttributeValue::command_result(command_id, ResultCode::Ok, &message);
        let detail = format!(
            "device: {} | LRC command: {} | result: {} | within timeout: {}s",
            device,
            command_id,
            result_payload(ResultCode::Ok, &message),
            timeout.as_secs_f64()
        );
        self.await_change(
            tracer,
            OBSERVE_LRC_RESULT,
            device,
            LONG_RUNNING_COMMAND_RESULT,
            &expected,
            timeout,
            &detail,
        )
    }

    /// [`observe_long_running_command_result`](Self::observe_long_running_command_result)
    /// with the default timeout.
    pub fn observe_long_running_command_result_default(
        &self,
        device: &str,
        handle: &CommandHandle,
        command_name: &str,
    ) -> Result<Observation> {
        self.observe_long_running_command_result(device, handle, command_name, self.default_timeout)
    }

    #[allow(clippy::too_many_arguments)]
    fn await_change(
        &self,
        tracer: &SharedTracer,
        operation: &'static str,
        device: &str,
        attribute: &str,
        expected: &AttributeValue,
        timeout: Duration,
        detail: &str,
    ) -> Result<Observation> {
        match tracer.wait_for_change(device, attribute, expected, timeout) {
            Ok(true) => self.conclude(
                operation,
                Verdict::Pass,
                format!("successfully captured ({})", detail),
            ),
            Ok(false) => self.conclude(
                operation,
                Verdict::Fail,
                format!("did not capture ({})", detail),
            ),
            Err(e) => {
                debug!(error = %e, operation, "Tracer query failed");
                self.conclude(
                    operation,
                    Verdict::Fail,
                    format!("did not capture ({}): {}", detail, e),
                )
            }
        }
    }

    fn conclude(
        &self,
        operation: &'static str,
        verdict: Verdict,
        description: String,
    ) -> Result<Observation> {
        let decision = self.logger.report(operation, verdict, &description);
        if decision.raise {
            return Err(ObserverError::ObservationFailed {
                operation: operation.to_string(),
                description,
            });
        }
        Ok(Observation::new(operation, verdict, description))
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.subscriptions.release();
    }
}

impl std::fmt::Debug for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer")
            .field("mode", &self.mode)
            .field("has_tracer", &self.has_tracer())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}
