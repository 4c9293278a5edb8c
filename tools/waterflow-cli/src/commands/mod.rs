pub mod config;
pub mod listen;
pub mod record;
pub mod replay;

use waterflow_gesture_model::event::Notification;
use waterflow_gesture_model::message::PackedMessage;

/// Render a notification as JSON, or as its packed message form.
pub fn format_notification(notification: &Notification, packed: bool) -> anyhow::Result<String> {
    if packed {
        let message = PackedMessage::encode(notification)?;
        Ok(format!(
            "id={:#06x} wparam={:#010x} lparam={:#010x}",
            message.message_id, message.wparam, message.lparam
        ))
    } else {
        Ok(serde_json::to_string(notification)?)
    }
}

/// Wait for Ctrl-C, or for `duration_secs` if given, whichever comes first.
pub async fn wait_for_shutdown(duration_secs: Option<u64>) -> anyhow::Result<()> {
    match duration_secs {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(tokio::time::Duration::from_secs(secs)) => {}
                result = tokio::signal::ctrl_c() => result?,
            }
        }
        None => tokio::signal::ctrl_c().await?,
    }
    Ok(())
}
