//! Minimum-interval gate for `Dragging` notifications.

use waterflow_common::clock::TimestampMs;

/// Enforces a minimum spacing between consecutive emissions.
///
/// "No emission yet" is `None` rather than a zero timestamp, so an emission
/// at t=0 still gates the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragThrottle {
    interval_ms: u64,
    last_emit_ms: Option<TimestampMs>,
}

impl DragThrottle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_emit_ms: None,
        }
    }

    /// Check whether an emission at `now_ms` is allowed.
    /// Returns true and records the emission if so.
    /// The first call after a reset always returns true.
    pub fn should_emit(&mut self, now_ms: TimestampMs) -> bool {
        match self.last_emit_ms {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => false,
            _ => {
                self.last_emit_ms = Some(now_ms);
                true
            }
        }
    }

    /// Record an emission that bypassed the gate.
    pub fn mark(&mut self, now_ms: TimestampMs) {
        self.last_emit_ms = Some(now_ms);
    }

    /// Forget the last emission.
    pub fn reset(&mut self) {
        self.last_emit_ms = None;
    }

    pub fn last_emit_ms(&self) -> Option<TimestampMs> {
        self.last_emit_ms
    }
}
