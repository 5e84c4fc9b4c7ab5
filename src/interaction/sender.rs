//! Posting messages to the channel.

use tracing::{error, info, instrument};

use crate::{base::types::MessageId, service::chat::ChatClient};

/// Send `text` to a channel, logging the outcome.
///
/// The message is linked to `reply_to` only when `reply_as_thread` is set.  Failures are
/// logged and swallowed; the return value says whether the message went out.
#[instrument(skip(chat, text))]
pub async fn send(chat: &ChatClient, channel_id: &str, text: &str, reply_to: Option<MessageId>, reply_as_thread: bool) -> bool {
    let reference = if reply_as_thread { reply_to } else { None };

    match chat.send_message(channel_id, text, reference).await {
        Ok(()) => {
            info!("Sent message: {}", text);
            true
        }
        Err(err) => {
            error!("Failed to send message: {:#}", err);
            false
        }
    }
}
