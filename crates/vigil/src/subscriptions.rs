//! Association between an observer and its event tracer.

use tracing::debug;

use vigil_core::{ObserverError, Result};
use vigil_observe::ReportLogger;
use vigil_trace::SharedTracer;

/// Owns the optional tracer association of an observer.
///
/// Every tracer-dependent operation fails with [`ObserverError::NoTracer`]
/// when nothing is attached.
///
/// A tracer is either owned (created for the observer) or borrowed (supplied
/// by the caller, possibly shared with other observers). Only an owned tracer
/// is reset by [`release`](Self::release).
pub struct Subscriptions {
    tracer: Option<SharedTracer>,
    owned: bool,
    logger: ReportLogger,
}

impl Subscriptions {
    /// Create a manager with no tracer attached.
    pub fn new(logger: ReportLogger) -> Self {
        Self {
            tracer: None,
            owned: false,
            logger,
        }
    }

    /// Create a manager with an optional caller-supplied tracer attached.
    pub fn with_tracer(logger: ReportLogger, tracer: Option<SharedTracer>) -> Self {
        Self {
            tracer,
            owned: false,
            logger,
        }
    }

    /// Create a manager that owns `tracer`.
    pub fn with_owned_tracer(logger: ReportLogger, tracer: SharedTracer) -> Self {
        Self {
            tracer: Some(tracer),
            owned: true,
            logger,
        }
    }

    /// Attach a caller-supplied tracer, returning the one it replaces.
    ///
    /// The replaced tracer is left untouched: detach and reset it first if
    /// its subscriptions should be released.
    pub fn attach(&mut self, tracer: SharedTracer) -> Option<SharedTracer> {
        debug!(replaced = self.tracer.is_some(), "Attaching event tracer");
        self.owned = false;
        self.tracer.replace(tracer)
    }

    /// Drop the association without unsubscribing.
    pub fn detach(&mut self) -> Option<SharedTracer> {
        debug!(attached = self.tracer.is_some(), "Detaching event tracer");
        self.owned = false;
        self.tracer.take()
    }

    /// Check if a tracer is attached.
    pub fn is_attached(&self) -> bool {
        self.tracer.is_some()
    }

    /// Check if the attached tracer was created for this manager.
    pub fn owns_tracer(&self) -> bool {
        self.tracer.is_some() && self.owned
    }

    /// Get the attached tracer.
    pub fn tracer(&self) -> Result<&SharedTracer> {
        self.tracer.as_ref().ok_or(ObserverError::NoTracer)
    }

    /// Subscribe the attached tracer to `attribute` on `device`.
    pub fn subscribe(&self, device: &str, attribute: &str) -> Result<()> {
        self.tracer()?
            .subscribe(device, attribute)
            .map_err(|e| ObserverError::Tracer(e.to_string()))?;
        self.logger.note(&format!(
            "Observer event tracer subscribed to {}: {}",
            device, attribute
        ));
        Ok(())
    }

    /// Discard events captured by the attached tracer.
    pub fn clear_events(&self) -> Result<()> {
        self.tracer()?.clear_events();
        Ok(())
    }

    /// Clear events, then release every subscription of the attached tracer.
    pub fn reset(&self) -> Result<()> {
        let tracer = self.tracer()?;
        tracer.clear_events();
        tracer.unsubscribe_all();
        Ok(())
    }

    /// Reset and drop the attached tracer, if any.
    ///
    /// Safe to call more than once.
    pub fn dispose(&mut self) {
        self.owned = false;
        if let Some(tracer) = self.tracer.take() {
            tracer.clear_events();
            tracer.unsubscribe_all();
            debug!("Disposed event tracer association");
        }
    }

    /// End the association at the owner's end of life.
    ///
    /// An owned tracer is disposed. A caller-supplied tracer is only
    /// detached, leaving its subscriptions to its other users.
    pub fn release(&mut self) {
        if self.owns_tracer() {
            self.dispose();
        } else {
            self.detach();
        }
    }
}

impl std::fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriptions")
            .field("attached", &self.is_attached())
            .field("owned", &self.owns_tracer())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vigil_core::{Mode, Severity};
    use vigil_observe::CollectingSink;
    use vigil_trace::{ChangeEvent, ChangeEventTracer, ChangeListener, DevState, EventBus};

    use super::*;

    const DEVICE: &str = "test/device/power_switch";

    fn manager() -> (Subscriptions, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::default());
        let logger = ReportLogger::new(sink.clone(), Mode::Reporting);
        (Subscriptions::new(logger), sink)
    }

    #[test]
    fn test_operations_without_tracer_fail() {
        let (subs, _) = manager();
        assert_eq!(subs.subscribe(DEVICE, "state"), Err(ObserverError::NoTracer));
        assert_eq!(subs.clear_events(), Err(ObserverError::NoTracer));
        assert_eq!(subs.reset(), Err(ObserverError::NoTracer));
        assert!(subs.tracer().is_err());
    }

    #[test]
    fn test_subscribe_logs_registration() {
        let (mut subs, sink) = manager();
        let tracer = Arc::new(ChangeEventTracer::new());
        subs.attach(tracer.clone());

        subs.subscribe(DEVICE, "state").unwrap();

        assert!(tracer.is_subscribed(DEVICE, "state"));
        let record = sink.last().unwrap();
        assert_eq!(record.severity, Severity::Info);
        assert_eq!(
            record.message,
            "Observer event tracer subscribed to test/device/power_switch: state"
        );
    }

    #[test]
    fn test_clear_events_keeps_subscriptions() {
        let (mut subs, _) = manager();
        let tracer = Arc::new(ChangeEventTracer::new());
        subs.attach(tracer.clone());
        subs.subscribe(DEVICE, "state").unwrap();
        tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::On));

        subs.clear_events().unwrap();

        assert_eq!(tracer.event_count(), 0);
        assert!(tracer.is_subscribed(DEVICE, "state"));
    }

    #[test]
    fn test_reset_unsubscribes() {
        let (mut subs, _) = manager();
        let tracer = Arc::new(ChangeEventTracer::new());
        subs.attach(tracer.clone());
        subs.subscribe(DEVICE, "state").unwrap();
        tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::On));

        subs.reset().unwrap();

        assert_eq!(tracer.event_count(), 0);
        assert!(tracer.subscriptions().is_empty());
        assert!(subs.is_attached());
    }

    #[test]
    fn test_detach_does_not_unsubscribe() {
        let (mut subs, _) = manager();
        let tracer = Arc::new(ChangeEventTracer::new());
        subs.attach(tracer.clone());
        subs.subscribe(DEVICE, "state").unwrap();

        assert!(subs.detach().is_some());
        assert!(!subs.is_attached());
        assert!(tracer.is_subscribed(DEVICE, "state"));
    }

    #[test]
    fn test_attach_replaces_without_touching_previous() {
        let (mut subs, _) = manager();
        let first = Arc::new(ChangeEventTracer::new());
        let second = Arc::new(ChangeEventTracer::new());

        subs.attach(first.clone());
        subs.subscribe(DEVICE, "state").unwrap();
        assert!(subs.attach(second.clone()).is_some());
        subs.subscribe(DEVICE, "health").unwrap();

        assert_eq!(first.subscriptions().len(), 1);
        assert!(first.is_subscribed(DEVICE, "state"));
        assert!(second.is_subscribed(DEVICE, "health"));
        assert!(!second.is_subscribed(DEVICE, "state"));
    }

    #[test]
    fn test_rejected_subscription_is_not_logged() {
        let (mut subs, sink) = manager();
        let bus = EventBus::shared();
        subs.attach(ChangeEventTracer::on_bus(&bus));
        drop(bus);

        match subs.subscribe(DEVICE, "state") {
            Err(ObserverError::Tracer(message)) => {
                assert_eq!(message, "Event source disconnected");
            }
            other => panic!("Expected tracer error, got {:?}", other),
        }
        assert!(!sink.contains("subscribed to"));
    }

    #[test]
    fn test_release_keeps_supplied_tracer() {
        let (mut subs, _) = manager();
        let tracer = Arc::new(ChangeEventTracer::new());
        subs.attach(tracer.clone());
        subs.subscribe(DEVICE, "state").unwrap();
        assert!(!subs.owns_tracer());

        subs.release();

        assert!(!subs.is_attached());
        assert!(tracer.is_subscribed(DEVICE, "state"));
    }

    #[test]
    fn test_release_resets_owned_tracer() {
        let sink = Arc::new(CollectingSink::default());
        let logger = ReportLogger::new(sink, Mode::Reporting);
        let tracer = Arc::new(ChangeEventTracer::new());
        let mut subs = Subscriptions::with_owned_tracer(logger, tracer.clone());
        subs.subscribe(DEVICE, "state").unwrap();
        assert!(subs.owns_tracer());

        subs.release();

        assert!(!subs.is_attached());
        assert!(tracer.subscriptions().is_empty());
    }

    #[test]
    fn test_attach_drops_ownership() {
        let sink = Arc::new(CollectingSink::default());
        let logger = ReportLogger::new(sink, Mode::Reporting);
        let mut subs = Subscriptions::with_owned_tracer(logger, Arc::new(ChangeEventTracer::new()));

        let supplied = Arc::new(ChangeEventTracer::new());
        subs.attach(supplied.clone());
        subs.subscribe(DEVICE, "state").unwrap();
        subs.release();

        assert!(supplied.is_subscribed(DEVICE, "state"));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let (mut subs, _) = manager();
        let tracer = Arc::new(ChangeEventTracer::new());
        subs.attach(tracer.clone());
        subs.subscribe(DEVICE, "state").unwrap();

        subs.dispose();
        subs.dispose();

        assert!(!subs.is_attached());
        assert!(tracer.subscriptions().is_empty());
    }
}
