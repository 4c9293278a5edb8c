//! Waterflow Hook Session
//!
//! Hosts the gesture classifier inside a pointer interception session:
//!
//! - **GestureHook:** the install/uninstall lifecycle around one classifier
//! - **Sources:** where raw pointer events come from (live device, trace
//!   file, or a pre-loaded stub)
//! - **HookRunner:** pumps a source into the hook on one task, so `feed`
//!   calls are serialized by construction
//! - **TraceWriter:** append-only JSONL capture of raw pointer input

pub mod backends;
pub mod writer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use waterflow_common::config::GestureConfig;
use waterflow_common::error::WaterflowResult;
use waterflow_gesture_core::{ClassifierState, GestureClassifier, NotificationSink};
use waterflow_gesture_model::event::{ConsumeDecision, PointerEvent};

/// Trait for raw pointer event sources.
pub trait PointerSource: Send {
    /// Poll for the next pointer event. Returns `None` if no event is available.
    fn poll(&mut self) -> WaterflowResult<Option<PointerEvent>>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Check if the source is usable on this system.
    fn is_available(&self) -> bool;
}

type BoxedSink = Box<dyn NotificationSink + Send>;

/// Sleep between polls of an idle source.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Sleep after a failed poll before trying again.
const SOURCE_ERROR_BACKOFF: Duration = Duration::from_millis(5);

/// Failed polls in a row after which the runner stops with the last error.
pub const MAX_CONSECUTIVE_SOURCE_ERRORS: u32 = 32;

/// Install/uninstall lifecycle around a single classifier.
///
/// While uninstalled every event passes through untouched. Each install
/// starts from a fresh classifier state.
pub struct GestureHook {
    config: GestureConfig,
    active: Option<GestureClassifier<BoxedSink>>,
}

impl GestureHook {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Install the hook, delivering notifications to `sink`.
    /// Returns false if the hook is already installed.
    pub fn start<S>(&mut self, sink: S) -> bool
    where
        S: NotificationSink + Send + 'static,
    {
        if self.active.is_some() {
            tracing::warn!("Gesture hook already installed");
            return false;
        }

        let sink: BoxedSink = Box::new(sink);
        self.active = Some(GestureClassifier::new(self.config, sink));
        tracing::info!(
            drag_threshold_px = self.config.drag_threshold_px,
            start_window_ms = self.config.start_window_ms,
            drag_throttle_ms = self.config.drag_throttle_ms,
            "Gesture hook installed"
        );
        true
    }

    /// Uninstall the hook. Dropping the sink lets a channel consumer
    /// observe the end of the stream. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.active.take().is_some() {
            tracing::info!("Gesture hook uninstalled");
        }
    }

    pub fn is_installed(&self) -> bool {
        self.active.is_some()
    }

    /// Route one raw event through the classifier, if installed.
    pub fn dispatch(&mut self, event: &PointerEvent) -> ConsumeDecision {
        match self.active.as_mut() {
            Some(classifier) => classifier.feed(event),
            None => ConsumeDecision::PassThrough,
        }
    }

    /// Classifier state of the installed hook.
    pub fn state(&self) -> Option<&ClassifierState> {
        self.active.as_ref().map(|classifier| classifier.state())
    }
}

impl Drop for GestureHook {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Counters reported by a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub events_seen: u64,
    pub consumed: u64,
    pub passed_through: u64,
}

impl RunStats {
    fn record(&mut self, decision: ConsumeDecision) {
        self.events_seen += 1;
        match decision {
            ConsumeDecision::Consume => self.consumed += 1,
            ConsumeDecision::PassThrough => self.passed_through += 1,
        }
    }
}

/// Pumps a pointer source into a gesture hook.
pub struct HookRunner {
    source: Box<dyn PointerSource>,
    hook: GestureHook,
    trace: Option<writer::TraceWriter>,
    stop_flag: Arc<AtomicBool>,
    stop_when_exhausted: bool,
    stats: RunStats,
}

impl HookRunner {
    pub fn new(source: Box<dyn PointerSource>, hook: GestureHook) -> Self {
        Self {
            source,
            hook,
            trace: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            stop_when_exhausted: false,
            stats: RunStats::default(),
        }
    }

    /// End the run as soon as the source reports no pending event.
    /// Meant for finite sources such as traces.
    pub fn stop_when_exhausted(mut self, enabled: bool) -> Self {
        self.stop_when_exhausted = enabled;
        self
    }

    /// Mirror every raw event into a trace file.
    pub fn with_trace(mut self, trace: writer::TraceWriter) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Run the pump loop until the stop flag is set. Uninstalls the hook
    /// and closes the trace on exit, including when the source gives up.
    pub async fn run(&mut self) -> WaterflowResult<RunStats> {
        tracing::info!(source = %self.source.name(), "Hook runner started");

        let outcome = self.pump().await;
        let closed = match self.trace.take() {
            Some(trace) => trace.finish().map(|_| ()),
            None => Ok(()),
        };
        self.hook.stop();
        tracing::info!(
            events = self.stats.events_seen,
            consumed = self.stats.consumed,
            passed_through = self.stats.passed_through,
            failed = outcome.is_err(),
            "Hook runner stopped"
        );

        outcome?;
        closed?;
        Ok(self.stats)
    }

    async fn pump(&mut self) -> WaterflowResult<()> {
        let mut consecutive_errors = 0u32;

        while !self.stop_flag.load(Ordering::Relaxed) {
            match self.source.poll() {
                Ok(Some(event)) => {
                    consecutive_errors = 0;
                    if let Some(trace) = self.trace.as_mut() {
                        trace.write_event(&event)?;
                    }
                    let decision = self.hook.dispatch(&event);
                    self.stats.record(decision);
                }
                Ok(None) if self.stop_when_exhausted => break,
                Ok(None) => {
                    consecutive_errors = 0;
                    tokio::time::sleep(IDLE_POLL_INTERVAL).await;
                }
                Err(e) => {
                    consecutive_errors += 1;
                    if consecutive_errors >= MAX_CONSECUTIVE_SOURCE_ERRORS {
                        tracing::error!(
                            error = %e,
                            consecutive_errors,
                            "Pointer source keeps failing, giving up"
                        );
                        return Err(e);
                    }
                    tracing::warn!(error = %e, consecutive_errors, "Pointer source error");
                    tokio::time::sleep(SOURCE_ERROR_BACKOFF).await;
                }
            }
        }
        Ok(())
    }

    /// Get the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn hook(&self) -> &GestureHook {
        &self.hook
    }
}
