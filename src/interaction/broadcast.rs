//! Unprompted sending of pool messages on a fixed interval.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, instrument};

use crate::{
    base::types::Void,
    service::{chat::ChatClient, pool::MessagePool},
};

use super::sender;

/// Sends a random pool message every `send_interval`, without reading the channel.
pub struct BroadcastLoop {
    chat: ChatClient,
    pool: MessagePool,
    channel_id: String,
    send_interval: Duration,
}

impl BroadcastLoop {
    pub fn new(chat: ChatClient, pool: MessagePool, channel_id: String, send_interval: Duration) -> Self {
        Self {
            chat,
            pool,
            channel_id,
            send_interval,
        }
    }

    /// Send forever.
    pub async fn run(&self) -> Void {
        loop {
            self.broadcast_once().await;

            info!("Waiting {:?} before sending the next message ...", self.send_interval);
            sleep(self.send_interval).await;
        }
    }

    /// Draw one message and send it; returns whether it went out.
    #[instrument(skip(self), fields(channel_id = %self.channel_id))]
    pub async fn broadcast_once(&self) -> bool {
        let text = self.pool.draw().await;

        sender::send(&self.chat, &self.channel_id, &text, None, false).await
    }
}
