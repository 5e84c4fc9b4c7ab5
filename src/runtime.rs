//! Runtime services and resolved settings for the auto-reply bot.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        settings::{Mode, ReplySource, Settings},
        types::{Res, Void},
    },
    interaction::{broadcast::BroadcastLoop, poll_loop::ReplyLoop, reply::ReplyGenerator},
    service::{chat::ChatClient, llm::LlmClient, pool::MessagePool},
};

/// Runtime service context.
///
/// This struct holds the configuration, the resolved settings, and the service clients
/// that the loops are built from.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The settings resolved at startup.
    pub settings: Settings,
    /// The chat client instance.
    pub chat: ChatClient,
    /// The static message pool.
    pub pool: MessagePool,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub fn new(config: Config, settings: Settings) -> Res<Self> {
        // Initialize the chat client.
        let chat = ChatClient::discord(&config)?;

        // Initialize the message pool.
        let pool = MessagePool::from_config(&config);

        Ok(Self { config, settings, chat, pool })
    }

    /// Run the loop selected by the settings.  Only returns on a fatal error.
    pub async fn start(&self) -> Void {
        let channel_id = self.settings.channel_id.clone();

        match &self.settings.mode {
            Mode::AutoReply(reply) => {
                let generator = ReplyGenerator::from_config(reply, self.pool.clone(), || LlmClient::gemini(&self.config))?;

                info!(
                    "Reply mode {} in {} using {:?} ...",
                    if reply.reply_mode { "enabled" } else { "disabled" },
                    reply.language,
                    reply.source()
                );

                if reply.source() == ReplySource::StaticPool {
                    info!("Replying with lines from `{}`.", self.pool.path().display());
                }

                let mut reply_loop = ReplyLoop::connect(self.chat.clone(), generator, channel_id, reply.clone()).await?;
                reply_loop.run().await
            }
            Mode::Broadcast { send_interval } => {
                info!("Random message sending mode active, drawing from `{}` ...", self.pool.path().display());

                BroadcastLoop::new(self.chat.clone(), self.pool.clone(), channel_id, *send_interval).run().await
            }
        }
    }
}
