//! Pointer source implementations.
//!
//! Each source provides a different way to obtain raw right-button events.

use std::path::Path;

use waterflow_common::clock::MonotonicClock;
use waterflow_common::config::SourceConfig;
use waterflow_common::error::{WaterflowError, WaterflowResult};
use waterflow_gesture_model::event::{parse_pointer_trace, PointerEvent};

use crate::PointerSource;

#[cfg(target_os = "linux")]
mod mice;

#[cfg(target_os = "linux")]
pub use mice::MiceSource;

/// Stub source for testing: replays pre-loaded events.
pub struct StubSource {
    events: Vec<PointerEvent>,
    index: usize,
}

impl StubSource {
    /// Create a stub source with pre-loaded events.
    pub fn new(events: Vec<PointerEvent>) -> Self {
        Self { events, index: 0 }
    }

    /// Create an empty stub that never produces events.
    pub fn empty() -> Self {
        Self {
            events: vec![],
            index: 0,
        }
    }
}

impl PointerSource for StubSource {
    fn poll(&mut self) -> WaterflowResult<Option<PointerEvent>> {
        let event = self.events.get(self.index).copied();
        if event.is_some() {
            self.index += 1;
        }
        Ok(event)
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Replays a recorded JSONL pointer trace.
pub struct TraceSource {
    inner: StubSource,
    name: String,
}

impl TraceSource {
    /// Load every event from a trace file up front.
    pub fn open(path: &Path) -> WaterflowResult<Self> {
        if !path.exists() {
            return Err(WaterflowError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let events = parse_pointer_trace(&content).map_err(|e| {
            WaterflowError::trace(format!("Failed to parse {}: {e}", path.display()))
        })?;
        tracing::debug!(events = events.len(), path = %path.display(), "Loaded pointer trace");

        Ok(Self {
            inner: StubSource::new(events),
            name: format!("trace:{}", path.display()),
        })
    }

    /// Events not yet polled.
    pub fn remaining(&self) -> usize {
        self.inner.events.len() - self.inner.index
    }
}

impl PointerSource for TraceSource {
    fn poll(&mut self) -> WaterflowResult<Option<PointerEvent>> {
        self.inner.poll()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Detect the best available live pointer source for the current system.
/// Live events are stamped by `clock`.
pub fn detect_best_source(
    config: &SourceConfig,
    clock: &MonotonicClock,
) -> Box<dyn PointerSource> {
    #[cfg(target_os = "linux")]
    {
        if MiceSource::is_supported(&config.device_path) {
            match MiceSource::new(config, clock.clone()) {
                Ok(source) => {
                    tracing::info!("Using mice device source");
                    return Box::new(source);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to initialize mice source, using stub");
                }
            }
        }

        tracing::warn!(
            details = %mice::device_diagnostic(&config.device_path),
            "Using stub pointer source, no gestures will be recognized"
        );
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = (config, clock);
        tracing::warn!("Live pointer sources for this platform are not implemented; using stub");
    }

    Box::new(StubSource::empty())
}
