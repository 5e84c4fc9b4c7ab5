//! The poll-generate-reply loop.

use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    base::{
        settings::ReplyConfig,
        types::{APOLOGY_REPLY, LastSeenState, MessageId, Res, Void},
    },
    service::chat::ChatClient,
};

use super::{reply::ReplyGenerator, sender};

/// What a single poll did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The channel has no messages.
    Idle,
    /// Fetching failed; treated as "nothing new".
    FetchFailed,
    /// The newest message was already processed.
    AlreadySeen(MessageId),
    /// The newest message was written by the bot itself.
    OwnMessage(MessageId),
    /// The newest message is a platform system message.
    SystemMessage(MessageId),
    /// A reply was produced and a send was attempted.
    Replied { message_id: MessageId, text: String, sent: bool },
    /// Generation failed and no fallback was configured, so nothing was sent.
    Skipped(MessageId),
}

/// Owns everything the reply loop reads and writes.
///
/// All state is mutated through `&mut self`, from a single task.
pub struct ReplyLoop {
    chat: ChatClient,
    generator: ReplyGenerator,
    channel_id: String,
    config: ReplyConfig,
    bot_id: String,
    state: LastSeenState,
}

impl ReplyLoop {
    /// Resolve the bot's own identity and build the loop.
    ///
    /// Failing to resolve the identity is fatal for reply mode.
    #[instrument(skip_all)]
    pub async fn connect(chat: ChatClient, generator: ReplyGenerator, channel_id: String, config: ReplyConfig) -> Res<Self> {
        let bot_id = chat.current_user_id().await.map_err(|e| e.context("Failed to retrieve bot information"))?;

        info!("Bot user ID: {}", bot_id);

        Ok(Self::with_identity(chat, generator, channel_id, config, bot_id))
    }

    /// Build the loop for an already known identity.
    pub fn with_identity(chat: ChatClient, generator: ReplyGenerator, channel_id: String, config: ReplyConfig, bot_id: String) -> Self {
        Self {
            chat,
            generator,
            channel_id,
            config,
            bot_id,
            state: LastSeenState::default(),
        }
    }

    pub fn bot_id(&self) -> &str {
        &self.bot_id
    }

    pub fn state(&self) -> &LastSeenState {
        &self.state
    }

    /// Poll forever, waiting `read_delay` after every poll.
    pub async fn run(&mut self) -> Void {
        loop {
            self.poll_once().await;

            debug!("Waiting {:?} before checking for new messages ...", self.config.read_delay);
            sleep(self.config.read_delay).await;
        }
    }

    /// Fetch the newest message and reply to it if it qualifies.
    #[instrument(skip(self), fields(channel_id = %self.channel_id))]
    pub async fn poll_once(&mut self) -> PollOutcome {
        let message = match self.chat.latest_message(&self.channel_id).await {
            Ok(Some(message)) => message,
            Ok(None) => return PollOutcome::Idle,
            Err(err) => {
                warn!("Error while checking messages: {:#}", err);
                return PollOutcome::FetchFailed;
            }
        };

        if !self.state.is_new(message.id) {
            return PollOutcome::AlreadySeen(message.id);
        }

        if message.author_id == self.bot_id {
            return PollOutcome::OwnMessage(message.id);
        }

        if message.is_system() {
            debug!("Ignoring system message {}", message.id);
            return PollOutcome::SystemMessage(message.id);
        }

        info!("Received message: {}", message.content);

        let text = match self.generator.generate(&message.content, &mut self.state).await {
            Ok(text) => Some(text),
            Err(err) => {
                error!("Failed to generate a reply: {:#}", err);
                self.config.fallback_on_error.then(|| APOLOGY_REPLY.to_string())
            }
        };

        let outcome = match text {
            Some(text) => {
                info!("Waiting {:?} before replying ...", self.config.reply_delay);
                sleep(self.config.reply_delay).await;

                let sent = sender::send(&self.chat, &self.channel_id, &text, Some(message.id), self.config.reply_mode).await;

                PollOutcome::Replied { message_id: message.id, text, sent }
            }
            None => PollOutcome::Skipped(message.id),
        };

        // Processed regardless of how sending went.
        self.state.mark_processed(message.id);

        outcome
    }
}
