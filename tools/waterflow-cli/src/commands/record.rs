//! Capture live pointer input into a trace file.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use waterflow_common::clock::MonotonicClock;
use waterflow_common::config::AppConfig;
use waterflow_gesture_core::ChannelSink;
use waterflow_hook_session::backends::detect_best_source;
use waterflow_hook_session::writer::TraceWriter;
use waterflow_hook_session::{GestureHook, HookRunner};

use super::wait_for_shutdown;

pub async fn run(
    config: &AppConfig,
    output: PathBuf,
    duration_secs: Option<u64>,
) -> anyhow::Result<()> {
    config.validate()?;

    // One clock stamps the events and dates the trace header.
    let clock = MonotonicClock::start();
    let source = detect_best_source(&config.source, &clock);
    let writer = TraceWriter::create(&output, &clock, source.name(), &config.source)?;

    // Classify while recording so the capture can be checked against what
    // the user saw.
    let (sink, mut receiver) = ChannelSink::channel();
    let mut hook = GestureHook::new(config.gesture);
    hook.start(sink);

    let mut runner = HookRunner::new(source, hook).with_trace(writer);
    let stop_flag = runner.stop_flag();
    let pump = tokio::spawn(async move { runner.run().await });

    let counter = tokio::spawn(async move {
        let mut count = 0u64;
        while let Some(notification) = receiver.recv().await {
            tracing::debug!(?notification, "Notification while recording");
            count += 1;
        }
        count
    });

    println!("Recording pointer input to {} (Ctrl-C to stop)...", output.display());
    wait_for_shutdown(duration_secs).await?;
    stop_flag.store(true, Ordering::SeqCst);

    let stats = pump.await??;
    let notifications = counter.await?;

    println!(
        "Recorded {} events ({} notifications) to {}",
        stats.events_seen,
        notifications,
        output.display()
    );
    Ok(())
}
