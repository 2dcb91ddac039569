//! # Vigil - Dual-Mode Observation Harness
//!
//! Vigil lets integration tests check conditions on devices under test,
//! including asynchronous attribute changes and long-running command results,
//! and report every check as PASS or FAIL.
//!
//! ## Features
//!
//! - **Dual mode**: a reporting observer logs failures and carries on, an
//!   asserting observer logs them and returns an error
//! - **Event tracing**: timeout-bounded waits on attribute change events,
//!   without polling
//! - **Long-running commands**: match a command's completion by tracking id
//! - **Pluggable**: any [`EventTracer`](vigil_trace::EventTracer) and any
//!   [`LogSink`](vigil_observe::LogSink)
//!
//! ## Quick Start
//!
//! ```
//! use vigil::prelude::*;
//!
//! let bus = EventBus::shared();
//! let observer = Observer::builder()
//!     .with_mode(Mode::Asserting)
//!     .with_event_bus(Arc::clone(&bus))
//!     .build()
//!     .unwrap();
//!
//! observer.subscribe("sys/dev/1", "state").unwrap();
//! bus.publish(ChangeEvent::new("sys/dev/1", "state", DevState::On));
//!
//! observer
//!     .observe_attribute_change("sys/dev/1", "state", DevState::On, Duration::from_secs(1))
//!     .unwrap();
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       Test code                         │
//! ├─────────────────────────────────────────────────────────┤
//! │                     vigil (facade)                      │
//! │        ┌──────────┐  ┌─────────────────┐                │
//! │        │ Observer │──│  Subscriptions  │                │
//! │        └────┬─────┘  └────────┬────────┘                │
//! │  ┌──────────┴─┬───────────────┴──┬──────────────────┐   │
//! │  │ vigil-core │ vigil-observe    │ vigil-trace      │   │
//! │  │ (mode,     │ (report lines,   │ (tracer, bus,    │   │
//! │  │  config)   │  sinks)          │  LRC types)      │   │
//! │  └────────────┴──────────────────┴──────────────────┘   │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod builder;
pub mod observer;
pub mod subscriptions;

pub use builder::ObserverBuilder;
pub use observer::Observer;
pub use subscriptions::Subscriptions;

// Re-export from sub-crates
pub use vigil_core;
pub use vigil_observe;
pub use vigil_trace;

/// Prelude module for convenient imports.
pub mod prelude {
    // Main types
    pub use crate::{Observer, ObserverBuilder, Subscriptions};

    // Core types
    pub use vigil_core::{Mode, Observation, ObserverConfig, ObserverError, Severity, Verdict};

    // Logging types
    pub use vigil_observe::{CollectingSink, LogSink, SharedSink, TracingSink};

    // Tracing types
    pub use vigil_trace::{
        AttributeValue, ChangeEvent, ChangeEventTracer, CommandHandle, DevState, EventBus,
        EventTracer, LONG_RUNNING_COMMAND_RESULT, ResultCode, SharedTracer,
    };

    // Common std types
    pub use std::sync::Arc;
    pub use std::time::Duration;
}
