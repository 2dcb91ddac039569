//! In-process event bus that devices publish attribute changes on.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::event::ChangeEvent;

/// Receiver of published change events.
pub trait ChangeListener: Send + Sync {
    /// Called for every event published on the bus.
    fn on_change(&self, event: &ChangeEvent);
}

/// Fan-out of change events to registered listeners.
///
/// Listeners are held weakly: dropping the last strong reference to a
/// listener unregisters it.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<Vec<Weak<dyn ChangeListener>>>,
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new shared event bus.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a listener.
    pub fn register<L: ChangeListener + 'static>(&self, listener: &Arc<L>) {
        let weak: Weak<dyn ChangeListener> = Arc::downgrade(listener) as Weak<dyn ChangeListener>;
        self.listeners.write().push(weak);
    }

    /// Get the number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .iter()
            .filter(|l| l.strong_count() > 0)
            .count()
    }

    /// Deliver an event to all live listeners.
    pub fn publish(&self, event: ChangeEvent) {
        tracing::trace!(
            device = %event.device,
            attribute = %event.attribute,
            value = %event.value,
            "Publishing change event"
        );

        let mut stale = false;
        {
            let listeners = self.listeners.read();
            for listener in listeners.iter() {
                match listener.upgrade() {
                    Some(listener) => listener.on_change(&event),
                    None => stale = true,
                }
            }
        }

        if stale {
            self.listeners.write().retain(|l| l.strong_count() > 0);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}
