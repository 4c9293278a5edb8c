//! Monotonic clock for stamping pointer events.
//!
//! Live pointer sources stamp every event with milliseconds elapsed since
//! the session epoch. Timestamps from one clock never decrease, which is
//! the ordering contract the gesture classifier relies on.

use std::time::Instant;

/// Milliseconds since an arbitrary, session-local epoch.
pub type TimestampMs = u64;

/// A session clock that provides monotonic millisecond timestamps
/// relative to a fixed epoch (the moment the session started).
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl MonotonicClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a clock from a known epoch.
    pub fn from_epoch(epoch: Instant, wall: String) -> Self {
        Self {
            epoch,
            epoch_wall: wall,
        }
    }

    /// Milliseconds elapsed since the epoch.
    pub fn now_ms(&self) -> TimestampMs {
        self.epoch.elapsed().as_millis() as TimestampMs
    }

    /// Wall-clock time at the epoch.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}
