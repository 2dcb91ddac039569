//! Event tracers: subscription bookkeeping and timeout-bounded queries.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::bus::{ChangeListener, EventBus};
use crate::error::{TraceResult, TracerError};
use crate::event::{AttributeKey, AttributeValue, ChangeEvent};

/// Capability to watch attribute changes and answer timed queries.
pub trait EventTracer: Send + Sync {
    /// Start capturing changes of `attribute` on `device`.
    fn subscribe(&self, device: &str, attribute: &str) -> TraceResult<()>;

    /// Stop capturing everything.
    fn unsubscribe_all(&self);

    /// Discard captured events, keeping subscriptions.
    fn clear_events(&self);

    /// Block until a change of (`device`, `attribute`) to `expected` has been
    /// captured, or `timeout` elapses.
    ///
    /// Returns whether a matching change was captured. Events captured since
    /// the last [`clear_events`](Self::clear_events) count, including those
    /// captured before the call.
    fn wait_for_change(
        &self,
        device: &str,
        attribute: &str,
        expected: &AttributeValue,
        timeout: Duration,
    ) -> TraceResult<bool>;
}

/// A shared reference to an event tracer.
pub type SharedTracer = Arc<dyn EventTracer>;

#[derive(Default)]
struct TracerState {
    subscriptions: HashSet<AttributeKey>,
    events: VecDeque<ChangeEvent>,
}

/// Tracer that captures change events from an [`EventBus`].
///
/// Only events for subscribed pairs are kept. Waiting callers are woken on
/// every captured event and re-check their match; no polling is involved.
/// When the buffer is full the oldest event is evicted.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use vigil_trace::{ChangeEvent, ChangeEventTracer, DevState, EventBus, EventTracer};
///
/// let bus = EventBus::shared();
/// let tracer = ChangeEventTracer::on_bus(&bus);
/// tracer.subscribe("test/device/1", "state").unwrap();
///
/// bus.publish(ChangeEvent::new("test/device/1", "state", DevState::On));
///
/// let seen = tracer
///     .wait_for_change("test/device/1", "state", &DevState::On.into(), Duration::from_millis(10))
///     .unwrap();
/// assert!(seen);
/// ```
pub struct ChangeEventTracer {
    state: Mutex<TracerState>,
    captured: Condvar,
    max_events: usize,
    source: Option<Weak<EventBus>>,
}

impl ChangeEventTracer {
    /// Default cap on buffered events.
    pub const DEFAULT_MAX_EVENTS: usize = 10_000;

    /// Create a tracer not connected to any bus.
    ///
    /// Events can be fed directly through [`ChangeListener::on_change`].
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_EVENTS)
    }

    /// Create a tracer that buffers at most `max_events` events.
    pub fn with_capacity(max_events: usize) -> Self {
        Self {
            state: Mutex::new(TracerState::default()),
            captured: Condvar::new(),
            max_events: max_events.max(1),
            source: None,
        }
    }

    /// Create a tracer registered on `bus`.
    ///
    /// The tracer holds the bus weakly. Once the bus is dropped, further
    /// subscriptions fail with [`TracerError::Disconnected`].
    pub fn on_bus(bus: &Arc<EventBus>) -> Arc<Self> {
        let tracer = Arc::new(Self {
            source: Some(Arc::downgrade(bus)),
            ..Self::new()
        });
        bus.register(&tracer);
        tracer
    }

    /// Check if the tracer's bus, if any, is still alive.
    pub fn is_connected(&self) -> bool {
        self.source
            .as_ref()
            .is_none_or(|bus| bus.strong_count() > 0)
    }

    /// Get a snapshot of captured events, oldest first.
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.state.lock().events.iter().cloned().collect()
    }

    /// Get the number of captured events.
    pub fn event_count(&self) -> usize {
        self.state.lock().events.len()
    }

    /// Get the current subscriptions, sorted.
    pub fn subscriptions(&self) -> Vec<AttributeKey> {
        let mut keys: Vec<_> = self.state.lock().subscriptions.iter().cloned().collect();
        keys.sort();
        keys
    }

    /// Check if (`device`, `attribute`) is subscribed.
    pub fn is_subscribed(&self, device: &str, attribute: &str) -> bool {
        self.state
            .lock()
            .subscriptions
            .contains(&AttributeKey::new(device, attribute))
    }

    /// Check whether a matching change has already been captured.
    pub fn has_change(&self, device: &str, attribute: &str, expected: &AttributeValue) -> bool {
        let key = AttributeKey::new(device, attribute);
        self.state
            .lock()
            .events
            .iter()
            .any(|e| e.matches(&key, expected))
    }
}

impl Default for ChangeEventTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl EventTracer for ChangeEventTracer {
    fn subscribe(&self, device: &str, attribute: &str) -> TraceResult<()> {
        if !self.is_connected() {
            return Err(TracerError::Disconnected);
        }
        let key = AttributeKey::new(device, attribute);
        let added = self.state.lock().subscriptions.insert(key.clone());
        if added {
            debug!(key = %key, "Subscribed to change events");
        } else {
            trace!(key = %key, "Already subscribed");
        }
        Ok(())
    }

    fn unsubscribe_all(&self) {
        let removed = {
            let mut state = self.state.lock();
            let removed = state.subscriptions.len();
            state.subscriptions.clear();
            removed
        };
        debug!(removed, "Unsubscribed from all change events");
    }

    fn clear_events(&self) {
        let cleared = {
            let mut state = self.state.lock();
            let cleared = state.events.len();
            state.events.clear();
            cleared
        };
        debug!(cleared, "Cleared captured events");
    }

    fn wait_for_change(
        &self,
        device: &str,
        attribute: &str,
        expected: &AttributeValue,
        timeout: Duration,
    ) -> TraceResult<bool> {
        let deadline = Instant::now()
            .checked_add(timeout)
            .ok_or_else(|| TracerError::InvalidTimeout(format!("{:?}", timeout)))?;
        let key = AttributeKey::new(device, attribute);

        let mut state = self.state.lock();
        if !state.subscriptions.contains(&key) {
            return Err(TracerError::NotSubscribed {
                device: device.to_string(),
                attribute: attribute.to_string(),
            });
        }

        loop {
            if state.events.iter().any(|e| e.matches(&key, expected)) {
                return Ok(true);
            }
            if self.captured.wait_until(&mut state, deadline).timed_out() {
                return Ok(state.events.iter().any(|e| e.matches(&key, expected)));
            }
        }
    }
}

impl ChangeListener for ChangeEventTracer {
    fn on_change(&self, event: &ChangeEvent) {
        let key = event.key();
        let mut state = self.state.lock();
        if !state.subscriptions.contains(&key) {
            return;
        }
        if state.events.len() >= self.max_events {
            state.events.pop_front();
            debug!(key = %key, max = self.max_events, "Event buffer full, evicted oldest event");
        }
        trace!(key = %key, value = %event.value, "Captured change event");
        state.events.push_back(event.clone());
        drop(state);
        self.captured.notify_all();
    }
}

impl std::fmt::Debug for ChangeEventTracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ChangeEventTracer")
            .field("subscriptions", &state.subscriptions.len())
            .field("events", &state.events.len())
            .field("max_events", &self.max_events)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::event::DevState;

    const DEVICE: &str = "test/device/power_switch";

    #[test]
    fn test_unsubscribed_events_are_ignored() {
        let bus = EventBus::shared();
        let tracer = ChangeEventTracer::on_bus(&bus);

        bus.publish(ChangeEvent::new(DEVICE, "state", DevState::On));
        assert_eq!(tracer.event_count(), 0);

        tracer.subscribe(DEVICE, "state").unwrap();
        bus.publish(ChangeEvent::new(DEVICE, "state", DevState::On));
        bus.publish(ChangeEvent::new(DEVICE, "health", "OK"));
        assert_eq!(tracer.event_count(), 1);
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let tracer = ChangeEventTracer::new();
        tracer.subscribe(DEVICE, "state").unwrap();
        tracer.subscribe(DEVICE, "State").unwrap();
        assert_eq!(tracer.subscriptions().len(), 1);
        assert!(tracer.is_subscribed(DEVICE, "STATE"));
    }

    #[test]
    fn test_wait_returns_immediately_for_captured_event() {
        let tracer = ChangeEventTracer::new();
        tracer.subscribe(DEVICE, "state").unwrap();
        tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::On));

        let start = Instant::now();
        let seen = tracer
            .wait_for_change(DEVICE, "state", &DevState::On.into(), Duration::from_secs(5))
            .unwrap();
        assert!(seen);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_wait_times_out() {
        let tracer = ChangeEventTracer::new();
        tracer.subscribe(DEVICE, "state").unwrap();
        tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::Off));

        let start = Instant::now();
        let seen = tracer
            .wait_for_change(DEVICE, "state", &DevState::On.into(), Duration::from_millis(50))
            .unwrap();
        let elapsed = start.elapsed();

        assert!(!seen);
        assert!(elapsed >= Duration::from_millis(50));
        assert!(
            elapsed < Duration::from_millis(500),
            "Should have timed out in ~50ms but took {:?}",
            elapsed
        );
    }

    #[test]
    fn test_wait_wakes_on_event_from_other_thread() {
        let tracer = Arc::new(ChangeEventTracer::new());
        tracer.subscribe(DEVICE, "state").unwrap();

        let publisher = {
            let tracer = Arc::clone(&tracer);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(30));
                tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::On));
            })
        };

        let seen = tracer
            .wait_for_change(DEVICE, "state", &DevState::On.into(), Duration::from_secs(2))
            .unwrap();
        publisher.join().unwrap();
        assert!(seen);
    }

    #[test]
    fn test_wait_requires_subscription() {
        let tracer = ChangeEventTracer::new();
        let result =
            tracer.wait_for_change(DEVICE, "state", &DevState::On.into(), Duration::from_millis(10));
        assert!(matches!(result, Err(TracerError::NotSubscribed { .. })));
    }

    #[test]
    fn test_clear_events_keeps_subscriptions() {
        let tracer = ChangeEventTracer::new();
        tracer.subscribe(DEVICE, "state").unwrap();
        tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::On));
        assert!(tracer.has_change(DEVICE, "state", &DevState::On.into()));

        tracer.clear_events();
        assert_eq!(tracer.event_count(), 0);
        assert!(tracer.is_subscribed(DEVICE, "state"));
        assert!(!tracer.has_change(DEVICE, "state", &DevState::On.into()));
    }

    #[test]
    fn test_unsubscribe_all_stops_capture() {
        let tracer = ChangeEventTracer::new();
        tracer.subscribe(DEVICE, "state").unwrap();
        tracer.unsubscribe_all();

        tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::On));
        assert_eq!(tracer.event_count(), 0);
        assert!(tracer.subscriptions().is_empty());
    }

    #[test]
    fn test_event_buffer_cap() {
        let tracer = ChangeEventTracer::with_capacity(2);
        tracer.subscribe(DEVICE, "state").unwrap();
        for _ in 0..5 {
            tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::On));
        }
        assert_eq!(tracer.event_count(), 2);
    }

    #[test]
    fn test_full_buffer_keeps_newest_event() {
        let tracer = ChangeEventTracer::with_capacity(2);
        tracer.subscribe(DEVICE, "state").unwrap();
        tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::Off));
        tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::Off));
        tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::On));

        let seen = tracer
            .wait_for_change(DEVICE, "state", &DevState::On.into(), Duration::from_millis(50))
            .unwrap();
        assert!(seen);

        let events = tracer.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].value, AttributeValue::State(DevState::On));
    }

    #[test]
    fn test_full_buffer_wakes_waiter() {
        let tracer = Arc::new(ChangeEventTracer::with_capacity(1));
        tracer.subscribe(DEVICE, "state").unwrap();
        tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::Off));

        let publisher = {
            let tracer = Arc::clone(&tracer);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(30));
                tracer.on_change(&ChangeEvent::new(DEVICE, "state", DevState::On));
            })
        };

        let seen = tracer
            .wait_for_change(DEVICE, "state", &DevState::On.into(), Duration::from_secs(2))
            .unwrap();
        publisher.join().unwrap();
        assert!(seen);
    }

    #[test]
    fn test_subscribe_after_bus_dropped() {
        let bus = EventBus::shared();
        let tracer = ChangeEventTracer::on_bus(&bus);
        tracer.subscribe(DEVICE, "state").unwrap();
        assert!(tracer.is_connected());

        drop(bus);

        assert!(!tracer.is_connected());
        assert_eq!(
            tracer.subscribe(DEVICE, "health"),
            Err(TracerError::Disconnected)
        );
        assert!(ChangeEventTracer::new().is_connected());
    }

    #[test]
    fn test_invalid_timeout() {
        let tracer = ChangeEventTracer::new();
        tracer.subscribe(DEVICE, "state").unwrap();
        let result =
            tracer.wait_for_change(DEVICE, "state", &DevState::On.into(), Duration::MAX);
        assert!(matches!(result, Err(TracerError::InvalidTimeout(_))));
    }
}
