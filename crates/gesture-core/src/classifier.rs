//! Right-drag gesture classification.
//!
//! A press starts a cycle. Movement beyond the drag threshold within the
//! start window turns the cycle into a gesture (`Start` at the anchor, then
//! `Dragging` samples, then `End` on release). A release without a gesture
//! is re-delivered as a click, unless the start window lapsed first, in
//! which case the cycle is swallowed.
//!
//! The raw press is always consumed; only classified output reaches the
//! consumer.

use waterflow_common::clock::TimestampMs;
use waterflow_common::config::GestureConfig;
use waterflow_gesture_model::event::{
    ConsumeDecision, GestureKind, Notification, Point, PointerEvent, PointerKind,
};

use crate::sink::NotificationSink;
use crate::throttle::DragThrottle;

/// Mutable per-cycle state. Reset on every press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierState {
    pub right_button_down: bool,

    /// Position at press time. Meaningful only while the button is down.
    pub anchor: Point,

    /// Set once the drag threshold is crossed; cleared only on release.
    pub gesture_active: bool,

    /// Cleared once the start window lapses without a gesture; stays
    /// cleared until the next press.
    pub timing_valid: bool,

    pub press_timestamp_ms: TimestampMs,

    /// Tracks the last `Dragging` emission.
    pub drag_throttle: DragThrottle,
}

impl ClassifierState {
    fn new(throttle_ms: u64) -> Self {
        Self {
            right_button_down: false,
            anchor: Point::default(),
            gesture_active: false,
            timing_valid: true,
            press_timestamp_ms: 0,
            drag_throttle: DragThrottle::new(throttle_ms),
        }
    }
}

/// Synchronous per-event reducer owning its state and its sink.
#[derive(Debug)]
pub struct GestureClassifier<S> {
    config: GestureConfig,
    threshold_sq: i64,
    state: ClassifierState,
    last_timestamp_ms: Option<TimestampMs>,
    sink: S,
}

impl<S: NotificationSink> GestureClassifier<S> {
    pub fn new(config: GestureConfig, sink: S) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid gesture config");
        Self {
            threshold_sq: config.drag_threshold_sq(),
            state: ClassifierState::new(config.drag_throttle_ms),
            last_timestamp_ms: None,
            config,
            sink,
        }
    }

    /// Classify one raw event and report whether to suppress it.
    ///
    /// Self-injected events pass through untouched. Timestamps must not
    /// decrease between calls; debug builds panic if they do.
    pub fn feed(&mut self, event: &PointerEvent) -> ConsumeDecision {
        if event.synthetic {
            tracing::trace!(kind = ?event.kind, "Ignoring injected pointer event");
            return ConsumeDecision::PassThrough;
        }

        self.check_ordering(event.timestamp_ms);

        let decision = match event.kind {
            PointerKind::ButtonDown => self.on_button_down(event),
            PointerKind::Move => self.on_move(event),
            PointerKind::ButtonUp => self.on_button_up(event),
        };

        debug_assert!(
            !self.state.gesture_active || self.state.right_button_down,
            "gesture active without the button held"
        );
        decision
    }

    fn check_ordering(&mut self, timestamp_ms: TimestampMs) {
        if let Some(last) = self.last_timestamp_ms {
            debug_assert!(
                timestamp_ms >= last,
                "pointer timestamps went backwards: {timestamp_ms} after {last}"
            );
        }
        self.last_timestamp_ms = Some(timestamp_ms.max(self.last_timestamp_ms.unwrap_or(0)));
    }

    fn on_button_down(&mut self, event: &PointerEvent) -> ConsumeDecision {
        let state = &mut self.state;
        state.right_button_down = true;
        state.anchor = event.position;
        state.gesture_active = false;
        state.timing_valid = true;
        state.press_timestamp_ms = event.timestamp_ms;
        state.drag_throttle.reset();

        tracing::trace!(x = event.position.x, y = event.position.y, "Right button pressed");
        ConsumeDecision::Consume
    }

    fn on_move(&mut self, event: &PointerEvent) -> ConsumeDecision {
        let state = &mut self.state;
        if !state.right_button_down || !state.timing_valid {
            return ConsumeDecision::PassThrough;
        }

        if state.gesture_active {
            if !state.drag_throttle.should_emit(event.timestamp_ms) {
                return ConsumeDecision::PassThrough;
            }
            self.sink
                .deliver(Notification::gesture(GestureKind::Dragging, event.position));
            return ConsumeDecision::Consume;
        }

        let elapsed_ms = event.timestamp_ms.saturating_sub(state.press_timestamp_ms);
        if elapsed_ms > self.config.start_window_ms {
            state.timing_valid = false;
            tracing::trace!(elapsed_ms, "Start window lapsed, cycle is not a gesture");
            return ConsumeDecision::PassThrough;
        }

        if state.anchor.distance_sq(event.position) <= self.threshold_sq {
            return ConsumeDecision::PassThrough;
        }

        state.gesture_active = true;
        state.drag_throttle.mark(event.timestamp_ms);
        tracing::trace!(elapsed_ms, "Drag threshold crossed, gesture started");

        self.sink
            .deliver(Notification::gesture(GestureKind::Start, state.anchor));
        self.sink
            .deliver(Notification::gesture(GestureKind::Dragging, event.position));
        ConsumeDecision::Consume
    }

    fn on_button_up(&mut self, event: &PointerEvent) -> ConsumeDecision {
        let state = &mut self.state;
        if !state.right_button_down {
            return ConsumeDecision::PassThrough;
        }
        state.right_button_down = false;

        if state.gesture_active {
            state.gesture_active = false;
            self.sink
                .deliver(Notification::gesture(GestureKind::End, event.position));
        } else if state.timing_valid {
            self.sink.deliver(Notification::click(event.position));
        } else {
            tracing::trace!("Swallowing release of a lapsed cycle");
        }
        ConsumeDecision::Consume
    }

    /// Current cycle state.
    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
