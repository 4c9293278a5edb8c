//! Waterflow Gesture Core
//!
//! Classifies a serialized stream of right-button pointer events into
//! gesture notifications:
//! - **Classifier:** the press/move/release state machine
//! - **Throttle:** bounds the rate of `Dragging` notifications
//! - **Sinks:** non-blocking delivery of notifications to a consumer
//!
//! `GestureClassifier::feed` never blocks, allocates only inside the sink,
//! and performs no I/O. Callers must serialize `feed` calls and deliver
//! events in non-decreasing timestamp order.

pub mod classifier;
pub mod sink;
pub mod throttle;

pub use classifier::{ClassifierState, GestureClassifier};
pub use sink::{ChannelSink, NotificationSink};
pub use throttle::DragThrottle;
