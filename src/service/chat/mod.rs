pub mod discord;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{MessageId, MessageRecord, Res, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the calls the bot makes against a chat platform's REST API.
/// Implementing this trait allows different chat services to be used with the bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot's own user ID.
    ///
    /// Called once at startup; the result is used to skip the bot's own messages.
    async fn current_user_id(&self) -> Res<String>;

    /// Get the most recent message in a channel, if there is one.
    async fn latest_message(&self, channel_id: &str) -> Res<Option<MessageRecord>>;

    /// Send a message to a channel.
    ///
    /// When `reply_to` is set, the new message is linked to that message.
    async fn send_message(&self, channel_id: &str, text: &str, reply_to: Option<MessageId>) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
