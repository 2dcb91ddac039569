//! Builder for configuring observers.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use vigil_core::{Mode, ObserverConfig, Result};
use vigil_observe::{ReportLogger, SharedSink, TracingSink};
use vigil_trace::{ChangeEventTracer, EventBus, SharedTracer};

use crate::observer::Observer;
use crate::subscriptions::Subscriptions;

/// Builder for an [`Observer`].
///
/// Tracer resolution on [`build`](Self::build):
///
/// 1. an explicit tracer from [`with_tracer`](Self::with_tracer) wins and
///    stays the caller's
/// 2. otherwise, if the config enables the event tracer, the observer owns a
///    new [`ChangeEventTracer`], registered on the bus given to
///    [`with_event_bus`](Self::with_event_bus) if there is one
/// 3. otherwise the observer starts without a tracer
pub struct ObserverBuilder {
    config: ObserverConfig,
    sink: Option<SharedSink>,
    tracer: Option<SharedTracer>,
    bus: Option<Arc<EventBus>>,
}

impl ObserverBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::from_config(ObserverConfig::default())
    }

    /// Create a builder from a configuration.
    pub fn from_config(config: ObserverConfig) -> Self {
        Self {
            config,
            sink: None,
            tracer: None,
            bus: None,
        }
    }

    /// Set the mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.config = self.config.with_mode(mode);
        self
    }

    /// Set the log sink. Defaults to a [`TracingSink`].
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Attach an explicit tracer.
    pub fn with_tracer(mut self, tracer: SharedTracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Set the bus the default tracer listens on.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Set the default observation timeout.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_default_timeout(timeout);
        self
    }

    /// Do not create a default tracer.
    pub fn without_event_tracer(mut self) -> Self {
        self.config = self.config.with_event_tracer(false);
        self
    }

    /// Build the observer.
    pub fn build(self) -> Result<Observer> {
        self.config.validate()?;

        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingSink::new()) as SharedSink);

        let subscriptions = |logger: ReportLogger| match (self.tracer, self.config.use_event_tracer) {
            (Some(tracer), _) => Subscriptions::with_tracer(logger, Some(tracer)),
            (None, true) => {
                debug!(on_bus = self.bus.is_some(), "Creating default change event tracer");
                let tracer: SharedTracer = match &self.bus {
                    Some(bus) => ChangeEventTracer::on_bus(bus),
                    None => Arc::new(ChangeEventTracer::new()),
                };
                Subscriptions::with_owned_tracer(logger, tracer)
            }
            (None, false) => Subscriptions::new(logger),
        };

        Ok(Observer::from_parts(
            self.config.mode,
            sink,
            self.config.default_timeout(),
            subscriptions,
        ))
    }
}

impl Default for ObserverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use vigil_observe::CollectingSink;
    use vigil_trace::{DevState, TracerError};

    use super::*;

    #[test]
    fn test_builder_defaults_without_bus() {
        let observer = ObserverBuilder::new()
            .with_sink(Arc::new(CollectingSink::default()))
            .build()
            .unwrap();

        assert!(observer.has_tracer());
        assert!(observer.subscriptions().owns_tracer());
        observer.subscribe("test/device/1", "state").unwrap();
    }

    #[test]
    fn test_builder_default_tracer_on_bus() {
        let bus = EventBus::shared();
        let observer = ObserverBuilder::new()
            .with_event_bus(Arc::clone(&bus))
            .with_sink(Arc::new(CollectingSink::default()))
            .build()
            .unwrap();

        assert!(observer.has_tracer());
        assert!(observer.subscriptions().owns_tracer());
        assert_eq!(bus.listener_count(), 1);
        assert_eq!(observer.mode(), Mode::Reporting);
        assert_eq!(observer.default_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_builder_without_event_tracer() {
        let observer = ObserverBuilder::new()
            .with_mode(Mode::Asserting)
            .without_event_tracer()
            .with_sink(Arc::new(CollectingSink::default()))
            .build()
            .unwrap();

        assert!(!observer.has_tracer());
        assert_eq!(observer.mode(), Mode::Asserting);
    }

    #[test]
    fn test_owned_tracer_reset_on_drop() {
        let bus = EventBus::shared();
        let observer = ObserverBuilder::new()
            .with_event_bus(Arc::clone(&bus))
            .with_sink(Arc::new(CollectingSink::default()))
            .build()
            .unwrap();
        observer.subscribe("test/device/1", "state").unwrap();
        let tracer = Arc::clone(observer.tracer().unwrap());

        drop(observer);

        let result =
            tracer.wait_for_change("test/device/1", "state", &DevState::On.into(), Duration::ZERO);
        assert!(matches!(result, Err(TracerError::NotSubscribed { .. })));
    }

    #[test]
    fn test_builder_explicit_tracer_wins() {
        let tracer = Arc::new(ChangeEventTracer::new());
        let observer = ObserverBuilder::from_config(ObserverConfig::asserting())
            .with_tracer(tracer.clone())
            .with_default_timeout(Duration::from_millis(250))
            .with_sink(Arc::new(CollectingSink::default()))
            .build()
            .unwrap();

        assert!(observer.has_tracer());
        assert!(!observer.subscriptions().owns_tracer());
        assert_eq!(observer.default_timeout(), Duration::from_millis(250));

        observer.subscribe("test/device/1", "state").unwrap();
        drop(observer);
        assert!(tracer.is_subscribed("test/device/1", "state"));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let err = ObserverBuilder::new()
            .without_event_tracer()
            .with_default_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, vigil_core::ObserverError::InvalidConfig(_)));
    }
}
