//! Notification delivery.
//!
//! The classifier runs on the thread that pumps the system pointer stream,
//! so a sink must hand notifications off without waiting on the consumer.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use waterflow_gesture_model::event::Notification;

/// Receives notifications in emission order. `deliver` must not block.
pub trait NotificationSink {
    fn deliver(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn deliver(&mut self, notification: Notification) {
        self.push(notification);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for Box<S> {
    fn deliver(&mut self, notification: Notification) {
        (**self).deliver(notification);
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn deliver(&mut self, notification: Notification) {
        (**self).deliver(notification);
    }
}

/// Queues notifications onto an unbounded channel read by the consumer at
/// its own pace. Sending never waits; once the receiver is gone,
/// notifications are dropped and counted.
#[derive(Debug)]
pub struct ChannelSink {
    sender: UnboundedSender<Notification>,
    discarded: u64,
}

impl ChannelSink {
    pub fn new(sender: UnboundedSender<Notification>) -> Self {
        Self {
            sender,
            discarded: 0,
        }
    }

    /// Create a sink together with the consumer's receiving end.
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    /// Notifications dropped because the consumer went away.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}

impl NotificationSink for ChannelSink {
    fn deliver(&mut self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            if self.discarded == 0 {
                tracing::debug!("Notification receiver closed, discarding notifications");
            }
            self.discarded += 1;
        }
    }
}
