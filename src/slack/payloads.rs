//! JSON bodies for the Slack Web API calls that take JSON.
//!
//! Kept as plain functions so the exact wire shapes can be tested without a server.

use serde_json::{Value, json};
use slack_morphism::{SlackChannelId, SlackFileId};

use crate::core::models::PostMessage;

/// Build the JSON payload for `files.completeUploadExternal`.
#[must_use]
pub fn build_complete_upload_payload(
    file_id: &SlackFileId,
    title: &str,
    channel: &SlackChannelId,
) -> Value {
    json!({
        "files": [{ "id": file_id.0, "title": title }],
        "channel_ids": [channel.0],
    })
}

/// Build the JSON payload for `chat.postMessage`.
///
/// `reply_broadcast` is only emitted for threaded replies; Slack ignores it
/// elsewhere and it must never go out without `thread_ts`.
#[must_use]
pub fn build_post_message_payload(message: &PostMessage) -> Value {
    let mut payload = json!({
        "channel": message.channel.0,
        "text": message.text,
    });

    if let Some(ts) = &message.thread_ts {
        payload["thread_ts"] = Value::String(ts.0.clone());
        if message.reply_broadcast {
            payload["reply_broadcast"] = Value::Bool(true);
        }
    }

    payload
}
