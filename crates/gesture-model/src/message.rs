//! Packed message form of a notification.
//!
//! Hosts that forward notifications through a window-message style queue
//! carry them as `(message_id, wparam, lparam)`:
//!
//! - gesture: id `WM_WATERFLOW_GESTURE`, wparam = gesture code,
//!   lparam = x in the low 16 bits, y in the high 16 bits
//! - click: id `WM_WATERFLOW_SIMULATE_CLICK`, wparam = x, lparam = y
//!
//! All coordinates are two's complement, so negative positions on
//! secondary monitors survive the trip.

use waterflow_common::error::{WaterflowError, WaterflowResult};

use crate::event::{GestureEvent, GestureKind, Notification, Point};

/// Base of the application-defined message range.
pub const WM_USER: u32 = 0x0400;
/// Gesture notification message id.
pub const WM_WATERFLOW_GESTURE: u32 = WM_USER + 1001;
/// Click re-delivery message id.
pub const WM_WATERFLOW_SIMULATE_CLICK: u32 = WM_USER + 1002;

/// A notification in window-message form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedMessage {
    pub message_id: u32,
    pub wparam: u32,
    pub lparam: u32,
}

impl PackedMessage {
    /// Pack a notification. Gesture positions must fit in 16 bits.
    pub fn encode(notification: &Notification) -> WaterflowResult<Self> {
        match notification {
            Notification::Gesture(event) => Ok(Self {
                message_id: WM_WATERFLOW_GESTURE,
                wparam: event.kind.code(),
                lparam: make_lparam(event.position)?,
            }),
            Notification::Click(click) => Ok(Self {
                message_id: WM_WATERFLOW_SIMULATE_CLICK,
                wparam: click.position.x as u32,
                lparam: click.position.y as u32,
            }),
        }
    }

    /// Unpack into a notification.
    pub fn decode(&self) -> WaterflowResult<Notification> {
        match self.message_id {
            WM_WATERFLOW_GESTURE => {
                let kind = GestureKind::from_code(self.wparam).ok_or_else(|| {
                    WaterflowError::codec(format!("unknown gesture code {}", self.wparam))
                })?;
                Ok(Notification::Gesture(GestureEvent::new(
                    kind,
                    split_lparam(self.lparam),
                )))
            }
            WM_WATERFLOW_SIMULATE_CLICK => Ok(Notification::click(Point::new(
                self.wparam as i32,
                self.lparam as i32,
            ))),
            other => Err(WaterflowError::codec(format!(
                "unknown message id {other:#06x}"
            ))),
        }
    }
}

fn make_lparam(position: Point) -> WaterflowResult<u32> {
    let narrow = |value: i32, axis: &str| {
        i16::try_from(value).map_err(|_| {
            WaterflowError::codec(format!("{axis} coordinate {value} does not fit in 16 bits"))
        })
    };
    let x = narrow(position.x, "x")?;
    let y = narrow(position.y, "y")?;
    Ok(((y as u16 as u32) << 16) | x as u16 as u32)
}

fn split_lparam(lparam: u32) -> Point {
    let x = (lparam & 0xFFFF) as u16 as i16;
    let y = (lparam >> 16) as u16 as i16;
    Point::new(x as i32, y as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_packing_layout() {
        let start = Notification::gesture(GestureKind::Start, Point::new(0x12, 0x34));
        let packed = PackedMessage::encode(&start).unwrap();
        assert_eq!(packed.message_id, 0x07E9);
        assert_eq!(packed.wparam, 1);
        assert_eq!(packed.lparam, 0x0034_0012);
        assert_eq!(packed.decode().unwrap(), start);
    }

    #[test]
    fn test_negative_coordinates_survive() {
        let dragging = Notification::gesture(GestureKind::Dragging, Point::new(-1920, -5));
        let packed = PackedMessage::encode(&dragging).unwrap();
        assert_eq!(packed.decode().unwrap(), dragging);

        let click = Notification::click(Point::new(-3000, 70_000));
        let packed = PackedMessage::encode(&click).unwrap();
        assert_eq!(packed.message_id, WM_WATERFLOW_SIMULATE_CLICK);
        assert_eq!(packed.decode().unwrap(), click);
    }

    #[test]
    fn test_gesture_out_of_range_is_rejected() {
        let far = Notification::gesture(GestureKind::End, Point::new(40_000, 0));
        assert!(matches!(
            PackedMessage::encode(&far),
            Err(WaterflowError::Codec { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_ids_and_codes() {
        let none_code = PackedMessage {
            message_id: WM_WATERFLOW_GESTURE,
            wparam: 0,
            lparam: 0,
        };
        assert!(none_code.decode().is_err());

        let foreign = PackedMessage {
            message_id: WM_USER,
            wparam: 0,
            lparam: 0,
        };
        assert!(foreign.decode().is_err());
    }

    #[test]
    fn test_cancel_is_decodable() {
        let packed = PackedMessage {
            message_id: WM_WATERFLOW_GESTURE,
            wparam: 4,
            lparam: 0,
        };
        assert_eq!(
            packed.decode().unwrap().gesture_kind(),
            Some(GestureKind::Cancel)
        );
    }
}
