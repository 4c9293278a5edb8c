//! Classify a recorded pointer trace offline.

use std::path::PathBuf;

use waterflow_common::config::AppConfig;
use waterflow_gesture_core::GestureClassifier;
use waterflow_gesture_model::event::{parse_notifications, Notification, PointerKind};
use waterflow_hook_session::backends::TraceSource;
use waterflow_hook_session::PointerSource;

use super::format_notification;

pub fn run(
    config: &AppConfig,
    trace: PathBuf,
    expect: Option<PathBuf>,
    packed: bool,
) -> anyhow::Result<()> {
    config.gesture.validate()?;

    let mut source = TraceSource::open(&trace)?;
    println!("Replaying {} ({} events)", trace.display(), source.remaining());

    let mut classifier = GestureClassifier::new(config.gesture, Vec::<Notification>::new());
    let mut previous_ts = None;
    while let Some(event) = source.poll()? {
        if previous_ts.is_some_and(|prev| event.timestamp_ms < prev) {
            anyhow::bail!(
                "Trace timestamps go backwards at t={}; traces must be ordered",
                event.timestamp_ms
            );
        }
        previous_ts = Some(event.timestamp_ms);

        let emitted_before = classifier.sink().len();
        let decision = classifier.feed(&event);

        let kind = match event.kind {
            PointerKind::ButtonDown => "down",
            PointerKind::Move => "move",
            PointerKind::ButtonUp => "up",
        };
        println!(
            "  t={:>6} {:<4} ({:>5},{:>5}){} -> {:?}",
            event.timestamp_ms,
            kind,
            event.position.x,
            event.position.y,
            if event.synthetic { " [injected]" } else { "" },
            decision
        );
        for notification in &classifier.sink()[emitted_before..] {
            println!("      => {}", format_notification(notification, packed)?);
        }
    }

    let notifications = classifier.into_sink();
    println!("\n{} notification(s)", notifications.len());

    if let Some(expect_path) = expect {
        let content = std::fs::read_to_string(&expect_path)?;
        let expected = parse_notifications(&content)?;
        if expected != notifications {
            println!("\nMismatch against {}:", expect_path.display());
            let len = expected.len().max(notifications.len());
            for i in 0..len {
                let want = expected.get(i).map(|n| serde_json::to_string(n)).transpose()?;
                let got = notifications
                    .get(i)
                    .map(|n| serde_json::to_string(n))
                    .transpose()?;
                if want != got {
                    println!(
                        "  #{i}: expected {} got {}",
                        want.as_deref().unwrap_or("<none>"),
                        got.as_deref().unwrap_or("<none>")
                    );
                }
            }
            anyhow::bail!("Replay output does not match {}", expect_path.display());
        }
        println!("Matches {}", expect_path.display());
    }

    Ok(())
}
