//! Vigil Trace - Attribute change-event tracing
//!
//! This crate provides the event feed observers consume:
//!
//! - [`EventTracer`]: the capability observers depend on (subscribe, clear,
//!   unsubscribe, timeout-bounded "did this change happen" queries)
//! - [`ChangeEventTracer`]: an in-process implementation backed by a
//!   mutex and condition variable
//! - [`EventBus`]: fan-out that devices publish [`ChangeEvent`]s on
//! - Long-running command types: [`CommandHandle`], [`ResultCode`] and the
//!   [`LONG_RUNNING_COMMAND_RESULT`] attribute
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  publish   ┌──────────┐  on_change   ┌───────────────────┐
//! │  device  │ ─────────▶ │ EventBus │ ───────────▶ │ ChangeEventTracer │
//! └──────────┘            └──────────┘              └─────────┬─────────┘
//!                                                   wait_for_change
//!                                                             │
//!                                                      ┌──────┴─────┐
//!                                                      │  observer  │
//!                                                      └────────────┘
//! ```

pub mod bus;
pub mod command;
pub mod error;
pub mod event;
pub mod tracer;

// Re-export main types
pub use bus::{ChangeListener, EventBus};
pub use command::{
    CommandHandle, LONG_RUNNING_COMMAND_RESULT, ResultCode, completed_ok_message, result_payload,
};
pub use error::{TraceResult, TracerError};
pub use event::{AttributeKey, AttributeValue, ChangeEvent, DevState};
pub use tracer::{ChangeEventTracer, EventTracer, SharedTracer};
