//! Pointer input and gesture notification types.
//!
//! Pointer events describe the right mouse button only: press, release, and
//! the moves in between. Coordinates are integer screen pixels and may be
//! negative on multi-monitor layouts. Timestamps are monotonic milliseconds
//! since a session-local epoch.
//!
//! Traces and expected-output files are JSONL, one value per line, with
//! `#`-prefixed header/comment lines.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use waterflow_common::clock::TimestampMs;

/// Low-level mouse message: pointer moved.
pub const WM_MOUSEMOVE: u32 = 0x0200;
/// Low-level mouse message: right button pressed.
pub const WM_RBUTTONDOWN: u32 = 0x0204;
/// Low-level mouse message: right button released.
pub const WM_RBUTTONUP: u32 = 0x0205;

/// Extra-info tag carried by events this system injects itself.
pub const INJECTED_EVENT_SIGNATURE: usize = 0xFF99_8877;

/// Integer screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance, saturating at `i64::MAX`.
    pub fn distance_sq(self, other: Point) -> i64 {
        let dx = self.x as i64 - other.x as i64;
        let dy = self.y as i64 - other.y as i64;
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }
}

/// Right-button pointer event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    ButtonDown,
    Move,
    ButtonUp,
}

impl PointerKind {
    /// Map a low-level mouse message id. Other buttons and wheel messages
    /// are not modeled and return `None`.
    pub fn from_message(message: u32) -> Option<Self> {
        match message {
            WM_RBUTTONDOWN => Some(Self::ButtonDown),
            WM_MOUSEMOVE => Some(Self::Move),
            WM_RBUTTONUP => Some(Self::ButtonUp),
            _ => None,
        }
    }

    /// The low-level mouse message id for this kind.
    pub fn message(self) -> u32 {
        match self {
            Self::ButtonDown => WM_RBUTTONDOWN,
            Self::Move => WM_MOUSEMOVE,
            Self::ButtonUp => WM_RBUTTONUP,
        }
    }
}

/// A single raw pointer event as delivered by the interception layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Monotonic milliseconds since the session epoch.
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    #[serde(rename = "type")]
    pub kind: PointerKind,

    #[serde(flatten)]
    pub position: Point,

    /// Set when the event was injected by this system.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, timestamp_ms: TimestampMs, x: i32, y: i32) -> Self {
        Self {
            timestamp_ms,
            kind,
            position: Point::new(x, y),
            synthetic: false,
        }
    }

    /// Create a right-button press.
    pub fn button_down(timestamp_ms: TimestampMs, x: i32, y: i32) -> Self {
        Self::new(PointerKind::ButtonDown, timestamp_ms, x, y)
    }

    /// Create a pointer move.
    pub fn moved(timestamp_ms: TimestampMs, x: i32, y: i32) -> Self {
        Self::new(PointerKind::Move, timestamp_ms, x, y)
    }

    /// Create a right-button release.
    pub fn button_up(timestamp_ms: TimestampMs, x: i32, y: i32) -> Self {
        Self::new(PointerKind::ButtonUp, timestamp_ms, x, y)
    }

    /// Build an event from a hook callback's raw fields. The event is
    /// flagged synthetic when `extra_info` carries the injection signature.
    pub fn from_hook(
        kind: PointerKind,
        position: Point,
        timestamp_ms: TimestampMs,
        extra_info: usize,
    ) -> Self {
        Self {
            timestamp_ms,
            kind,
            position,
            synthetic: extra_info == INJECTED_EVENT_SIGNATURE,
        }
    }

    /// Mark this event as self-injected.
    pub fn injected(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

/// Gesture notification tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Start,
    Dragging,
    End,
    /// Never emitted by the current classifier; consumers must accept it.
    Cancel,
}

impl GestureKind {
    /// Numeric signal code used in the packed message form.
    pub fn code(self) -> u32 {
        match self {
            Self::Start => 1,
            Self::Dragging => 2,
            Self::End => 3,
            Self::Cancel => 4,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Start),
            2 => Some(Self::Dragging),
            3 => Some(Self::End),
            4 => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// A classified gesture event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub kind: GestureKind,

    #[serde(flatten)]
    pub position: Point,
}

impl GestureEvent {
    pub fn new(kind: GestureKind, position: Point) -> Self {
        Self { kind, position }
    }
}

/// A press/release pair that never became a drag, to be re-delivered as a
/// plain right click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickSignal {
    #[serde(flatten)]
    pub position: Point,
}

impl ClickSignal {
    pub fn new(position: Point) -> Self {
        Self { position }
    }

    /// The injected press/release pair that re-delivers this click. Both
    /// events are flagged synthetic so the classifier lets them through.
    pub fn replay_events(&self, timestamp_ms: TimestampMs) -> [PointerEvent; 2] {
        let Point { x, y } = self.position;
        [
            PointerEvent::button_down(timestamp_ms, x, y).injected(),
            PointerEvent::button_up(timestamp_ms, x, y).injected(),
        ]
    }
}

/// Anything the classifier hands to its sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    Gesture(GestureEvent),
    Click(ClickSignal),
}

impl Notification {
    pub fn gesture(kind: GestureKind, position: Point) -> Self {
        Self::Gesture(GestureEvent::new(kind, position))
    }

    pub fn click(position: Point) -> Self {
        Self::Click(ClickSignal::new(position))
    }

    /// Position carried by the notification.
    pub fn position(&self) -> Point {
        match self {
            Self::Gesture(event) => event.position,
            Self::Click(click) => click.position,
        }
    }

    /// Gesture tag, if this is a gesture notification.
    pub fn gesture_kind(&self) -> Option<GestureKind> {
        match self {
            Self::Gesture(event) => Some(event.kind),
            Self::Click(_) => None,
        }
    }
}

/// Whether the raw event should be suppressed from the rest of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumeDecision {
    Consume,
    PassThrough,
}

impl ConsumeDecision {
    pub fn is_consumed(self) -> bool {
        matches!(self, Self::Consume)
    }
}

/// Header line written at the top of a recorded pointer trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at the trace epoch (RFC 3339).
    pub epoch_wall: String,

    /// Name of the pointer source that produced the trace.
    pub source: String,

    /// Desktop bounds used while recording.
    pub screen_width: u32,
    pub screen_height: u32,
}

fn parse_jsonl<T: DeserializeOwned>(jsonl: &str) -> Result<Vec<T>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

fn serialize_jsonl<T: Serialize>(items: &[T]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for item in items {
        output.push_str(&serde_json::to_string(item)?);
        output.push('\n');
    }
    Ok(output)
}

/// Parse a pointer trace from JSONL content.
pub fn parse_pointer_trace(jsonl: &str) -> Result<Vec<PointerEvent>, serde_json::Error> {
    parse_jsonl(jsonl)
}

/// Parse notifications (e.g. an expected-output file) from JSONL content.
pub fn parse_notifications(jsonl: &str) -> Result<Vec<Notification>, serde_json::Error> {
    parse_jsonl(jsonl)
}

/// Serialize notifications to JSONL.
pub fn serialize_notifications(
    notifications: &[Notification],
) -> Result<String, serde_json::Error> {
    serialize_jsonl(notifications)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_event_json_format() {
        let event = PointerEvent::moved(50, 20, -4);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"t\":50"));
        assert!(json.contains("\"type\":\"move\""));
        assert!(json.contains("\"x\":20"));
        assert!(json.contains("\"y\":-4"));
        assert!(!json.contains("synthetic"));

        let injected = serde_json::to_string(&event.injected()).unwrap();
        assert!(injected.contains("\"synthetic\":true"));
    }

    #[test]
    fn test_parse_trace_skips_header_and_blank_lines() {
        let jsonl = "# {\"schema_version\":\"1.0\"}\n\n\
            {\"t\":0,\"type\":\"button_down\",\"x\":0,\"y\":0}\n\
            {\"t\":50,\"type\":\"button_up\",\"x\":2,\"y\":2,\"synthetic\":true}\n";
        let parsed = parse_pointer_trace(jsonl).unwrap();
        assert_eq!(
            parsed,
            vec![
                PointerEvent::button_down(0, 0, 0),
                PointerEvent::button_up(50, 2, 2).injected(),
            ]
        );
    }

    #[test]
    fn test_notification_json_format() {
        let start = Notification::gesture(GestureKind::Start, Point::new(0, 0));
        assert_eq!(
            serde_json::to_string(&start).unwrap(),
            r#"{"type":"gesture","kind":"start","x":0,"y":0}"#
        );

        let click = Notification::click(Point::new(2, 2));
        assert_eq!(
            serde_json::to_string(&click).unwrap(),
            r#"{"type":"click","x":2,"y":2}"#
        );

        let jsonl = serialize_notifications(&[start, click]).unwrap();
        assert_eq!(parse_notifications(&jsonl).unwrap(), vec![start, click]);
    }

    #[test]
    fn test_from_hook_detects_injection_signature() {
        let point = Point::new(10, 10);
        let user = PointerEvent::from_hook(PointerKind::Move, point, 5, 0);
        assert!(!user.synthetic);

        let injected =
            PointerEvent::from_hook(PointerKind::Move, point, 5, INJECTED_EVENT_SIGNATURE);
        assert!(injected.synthetic);
    }

    #[test]
    fn test_pointer_kind_from_message() {
        assert_eq!(
            PointerKind::from_message(0x0204),
            Some(PointerKind::ButtonDown)
        );
        assert_eq!(PointerKind::from_message(0x0200), Some(PointerKind::Move));
        assert_eq!(PointerKind::from_message(0x0205), Some(PointerKind::ButtonUp));
        // Left button down is not modeled.
        assert_eq!(PointerKind::from_message(0x0201), None);
        assert_eq!(
            PointerKind::from_message(PointerKind::ButtonUp.message()),
            Some(PointerKind::ButtonUp)
        );
    }

    #[test]
    fn test_gesture_codes() {
        for kind in [
            GestureKind::Start,
            GestureKind::Dragging,
            GestureKind::End,
            GestureKind::Cancel,
        ] {
            assert_eq!(GestureKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(GestureKind::from_code(0), None);
        assert_eq!(GestureKind::from_code(5), None);
    }

    #[test]
    fn test_click_replay_events_are_synthetic() {
        let click = ClickSignal::new(Point::new(7, 9));
        let [down, up] = click.replay_events(120);
        assert_eq!(down.kind, PointerKind::ButtonDown);
        assert_eq!(up.kind, PointerKind::ButtonUp);
        assert!(down.synthetic && up.synthetic);
        assert_eq!(down.position, Point::new(7, 9));
    }

    #[test]
    fn test_distance_sq_handles_extreme_coordinates() {
        let a = Point::new(i32::MIN, i32::MIN);
        let b = Point::new(i32::MAX, i32::MAX);
        assert_eq!(a.distance_sq(b), i64::MAX);
        assert_eq!(Point::new(3, 4).distance_sq(Point::new(0, 0)), 25);
    }
}
