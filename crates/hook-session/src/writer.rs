//! Pointer trace capture.
//!
//! A trace starts with a `#` header line naming the session epoch, so event
//! timestamps (milliseconds since that epoch) can be placed in wall-clock
//! time. The writer must share its clock with the source that stamps the
//! events, otherwise the header describes a different epoch.
//!
//! Output is flushed at the end of every press/release cycle. A crash loses
//! at most the cycle in flight, never a half-classified one that replay
//! would misread as a lapsed hold.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use waterflow_common::clock::MonotonicClock;
use waterflow_common::config::SourceConfig;
use waterflow_common::error::{WaterflowError, WaterflowResult};
use waterflow_gesture_model::event::{PointerEvent, PointerKind, TraceHeader};

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

/// Records raw pointer events as JSONL.
pub struct TraceWriter {
    writer: BufWriter<File>,
    events_written: u64,
    cycles_written: u64,
}

impl TraceWriter {
    /// Create (or truncate) `path` and write the header for a session
    /// stamped by `clock`.
    pub fn create(
        path: &Path,
        clock: &MonotonicClock,
        source: &str,
        screen: &SourceConfig,
    ) -> WaterflowResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let header = TraceHeader {
            schema_version: TRACE_SCHEMA_VERSION.to_string(),
            epoch_wall: clock.epoch_wall().to_string(),
            source: source.to_string(),
            screen_width: screen.screen_width,
            screen_height: screen.screen_height,
        };

        let mut writer = BufWriter::new(file);
        writeln!(writer, "# {}", serde_json::to_string(&header)?)
            .map_err(|e| WaterflowError::trace(format!("Failed to write header: {e}")))?;
        tracing::debug!(path = %path.display(), epoch = %header.epoch_wall, "Trace opened");

        Ok(Self {
            writer,
            events_written: 0,
            cycles_written: 0,
        })
    }

    /// Append one event. A release closes the cycle and flushes it.
    pub fn write_event(&mut self, event: &PointerEvent) -> WaterflowResult<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| WaterflowError::trace(format!("Failed to write event: {e}")))?;
        self.events_written += 1;

        if event.kind == PointerKind::ButtonUp && !event.synthetic {
            self.cycles_written += 1;
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> WaterflowResult<()> {
        self.writer
            .flush()
            .map_err(|e| WaterflowError::trace(format!("Failed to flush trace: {e}")))
    }

    /// Flush whatever is left of an unfinished cycle and close the file.
    pub fn finish(mut self) -> WaterflowResult<u64> {
        self.flush()?;
        Ok(self.events_written)
    }

    pub fn events_written(&self) -> u64 {
        self.events_written
    }

    /// Completed press/release cycles.
    pub fn cycles_written(&self) -> u64 {
        self.cycles_written
    }
}

impl Drop for TraceWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "Trace lost buffered events on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::TraceSource;
    use crate::PointerSource;
    use std::time::{Duration, Instant};

    fn trace_header(content: &str) -> TraceHeader {
        let line = content.lines().next().unwrap();
        serde_json::from_str(line.strip_prefix("# ").unwrap()).unwrap()
    }

    #[test]
    fn test_written_trace_replays() {
        let dir = std::env::temp_dir().join("waterflow_test_writer");
        let _ = std::fs::remove_dir_all(&dir);

        let path = dir.join("capture.jsonl");
        let events = [
            PointerEvent::button_down(0, 10, 10),
            PointerEvent::moved(16, 40, 12),
            PointerEvent::button_up(30, 40, 12),
        ];

        let clock = MonotonicClock::start();
        let mut writer =
            TraceWriter::create(&path, &clock, "stub", &SourceConfig::default()).unwrap();
        for event in &events {
            writer.write_event(event).unwrap();
        }
        assert_eq!(writer.cycles_written(), 1);
        assert_eq!(writer.finish().unwrap(), 3);

        let mut source = TraceSource::open(&path).unwrap();
        let mut replayed = Vec::new();
        while let Some(event) = source.poll().unwrap() {
            replayed.push(event);
        }
        assert_eq!(replayed, events);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_header_carries_session_epoch() {
        let dir = std::env::temp_dir().join("waterflow_test_writer_header");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("capture.jsonl");

        let clock = MonotonicClock::from_epoch(
            Instant::now() - Duration::from_secs(5),
            "2026-03-01T12:00:00+00:00".to_string(),
        );
        let screen = SourceConfig {
            screen_width: 2560,
            screen_height: 1440,
            ..SourceConfig::default()
        };
        TraceWriter::create(&path, &clock, "mice", &screen)
            .unwrap()
            .finish()
            .unwrap();

        let header = trace_header(&std::fs::read_to_string(&path).unwrap());
        assert_eq!(header.epoch_wall, clock.epoch_wall());
        assert_eq!(header.schema_version, TRACE_SCHEMA_VERSION);
        assert_eq!(header.source, "mice");
        assert_eq!((header.screen_width, header.screen_height), (2560, 1440));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_completed_cycle_is_on_disk_while_open() {
        let dir = std::env::temp_dir().join("waterflow_test_writer_cycle");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("capture.jsonl");

        let clock = MonotonicClock::start();
        let mut writer =
            TraceWriter::create(&path, &clock, "stub", &SourceConfig::default()).unwrap();
        writer.write_event(&PointerEvent::button_down(0, 5, 5)).unwrap();
        writer.write_event(&PointerEvent::moved(8, 30, 5)).unwrap();

        // An injected release is not the end of a cycle.
        writer
            .write_event(&PointerEvent::button_up(9, 30, 5).injected())
            .unwrap();
        assert_eq!(writer.cycles_written(), 0);

        writer.write_event(&PointerEvent::button_up(12, 30, 5)).unwrap();
        assert_eq!(writer.cycles_written(), 1);

        // Still open: the finished cycle must already be readable.
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 5);
        let last: PointerEvent = serde_json::from_str(content.lines().last().unwrap()).unwrap();
        assert_eq!(last, PointerEvent::button_up(12, 30, 5));

        drop(writer);
        std::fs::remove_dir_all(&dir).ok();
    }
}
