//! Waterflow Gesture Model
//!
//! Defines the data contracts shared by the classifier and its hosts:
//! - **Pointer events:** right-button down/move/up samples with a
//!   monotonic millisecond timestamp and a self-injection flag
//! - **Notifications:** classified gesture events and click signals
//! - **Traces:** JSONL serialization for recorded pointer input
//! - **Messages:** the packed `(id, wparam, lparam)` form of a notification

pub mod event;
pub mod message;

pub use event::*;
pub use message::*;
