//! Classify live pointer input.

use std::sync::atomic::Ordering;

use waterflow_common::clock::MonotonicClock;
use waterflow_common::config::AppConfig;
use waterflow_gesture_core::ChannelSink;
use waterflow_hook_session::backends::detect_best_source;
use waterflow_hook_session::{GestureHook, HookRunner};

use super::{format_notification, wait_for_shutdown};

pub async fn run(
    config: &AppConfig,
    duration_secs: Option<u64>,
    packed: bool,
) -> anyhow::Result<()> {
    config.validate()?;

    let source = detect_best_source(&config.source, &MonotonicClock::start());
    let (sink, mut receiver) = ChannelSink::channel();
    let mut hook = GestureHook::new(config.gesture);
    if !hook.start(sink) {
        anyhow::bail!("Gesture hook is already installed");
    }

    let mut runner = HookRunner::new(source, hook);
    let stop_flag = runner.stop_flag();
    let pump = tokio::spawn(async move { runner.run().await });

    let printer = tokio::spawn(async move {
        while let Some(notification) = receiver.recv().await {
            match format_notification(&notification, packed) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "Failed to format notification"),
            }
        }
    });

    println!("Listening for right-drag gestures (Ctrl-C to stop)...");
    wait_for_shutdown(duration_secs).await?;
    stop_flag.store(true, Ordering::SeqCst);

    let stats = pump.await??;
    // The runner uninstalls the hook on exit, which closes the channel.
    printer.await?;

    println!(
        "\n{} pointer events: {} consumed, {} passed through",
        stats.events_seen, stats.consumed, stats.passed_through
    );
    Ok(())
}
