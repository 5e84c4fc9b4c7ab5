//! Common types and result handling.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// The error type used throughout the bot.
pub type Err = anyhow::Error;
/// Result with the bot's error type.
pub type Res<T> = Result<T, Err>;
/// Result with no value.
pub type Void = Res<()>;

/// The platform's "system message" sentinel type, which never gets a reply.
pub const SYSTEM_MESSAGE_TYPE: u8 = 8;

/// Sent when the generator cannot produce anything usable.
pub const APOLOGY_REPLY: &str = "Sorry, unable to reply.";

/// A chat message id.
///
/// Ids are numeric strings on the wire, and they are compared as integers.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(#[serde_as(as = "DisplayFromStr")] pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MessageId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// The most recent message observed in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    /// The message id.
    pub id: MessageId,
    /// The id of the account that wrote the message.
    pub author_id: String,
    /// The message text.
    pub content: String,
    /// The platform message type.
    pub kind: u8,
}

impl MessageRecord {
    /// Whether this is a platform system message rather than user content.
    pub fn is_system(&self) -> bool {
        self.kind == SYSTEM_MESSAGE_TYPE
    }
}

/// In-memory tracking of what the reply loop has already handled.
///
/// Lives for the process lifetime; nothing here survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastSeenState {
    /// The newest message id that has been processed.
    pub last_message_id: Option<MessageId>,
    /// The last non-duplicate reply produced by the generator.
    pub last_reply_text: Option<String>,
}

impl LastSeenState {
    /// Whether `id` is strictly newer than anything processed so far.
    pub fn is_new(&self, id: MessageId) -> bool {
        self.last_message_id.is_none_or(|last| id > last)
    }

    /// Records `id` as processed.  Never moves backwards.
    pub fn mark_processed(&mut self, id: MessageId) {
        if self.is_new(id) {
            self.last_message_id = Some(id);
        }
    }
}
