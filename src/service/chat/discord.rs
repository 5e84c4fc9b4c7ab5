//! Discord REST integration for the auto-reply bot.
//!
//! This module talks to the Discord v9 REST API with a plain `reqwest` client:
//! - Resolving the bot's own user id
//! - Reading the newest message in a channel
//! - Posting messages, optionally as a reply to another message

use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use async_trait::async_trait;
use reqwest::{StatusCode, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::base::{
    config::Config,
    types::{MessageId, MessageRecord, Res, Void},
};

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the discord implementation.

impl ChatClient {
    /// Creates a new Discord chat client.
    pub fn discord(config: &Config) -> Res<Self> {
        let client = DiscordChatClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Wire types.

#[derive(Debug, Deserialize)]
struct DiscordUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DiscordMessage {
    id: MessageId,
    #[serde(default)]
    author: Option<DiscordUser>,
    #[serde(default)]
    content: String,
    #[serde(rename = "type", default)]
    kind: u8,
}

impl From<DiscordMessage> for MessageRecord {
    fn from(message: DiscordMessage) -> Self {
        Self {
            id: message.id,
            author_id: message.author.map(|a| a.id).unwrap_or_default(),
            content: message.content,
            kind: message.kind,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_reference: Option<MessageReference>,
}

#[derive(Debug, Serialize)]
struct MessageReference {
    message_id: MessageId,
}

/// Build the body of a `POST /channels/{id}/messages` call.
fn create_message_body(text: &str, reply_to: Option<MessageId>) -> CreateMessage<'_> {
    CreateMessage {
        content: text,
        message_reference: reply_to.map(|message_id| MessageReference { message_id }),
    }
}

// Specific implementations.

/// Discord client implementation.
#[derive(Clone)]
pub struct DiscordChatClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl DiscordChatClient {
    /// Create a new Discord chat client.
    #[instrument(name = "DiscordChatClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let client = reqwest::Client::builder().user_agent(concat!("chat-autoreply/", env!("CARGO_PKG_VERSION"))).build()?;

        Ok(Self {
            client,
            api_base: config.discord_api_base.trim_end_matches('/').to_string(),
            token: config.discord_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

#[async_trait]
impl GenericChatClient for DiscordChatClient {
    #[instrument(skip(self))]
    async fn current_user_id(&self) -> Res<String> {
        let response = self.client.get(self.url("/users/@me")).header(AUTHORIZATION, &self.token).send().await.context("Failed to request the current user")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Discord API error while fetching the current user ({status}): {body}");
        }

        let user: DiscordUser = response.json().await.context("Failed to parse the current user")?;

        Ok(user.id)
    }

    #[instrument(skip(self))]
    async fn latest_message(&self, channel_id: &str) -> Res<Option<MessageRecord>> {
        let response = self
            .client
            .get(self.url(&format!("/channels/{channel_id}/messages")))
            .header(AUTHORIZATION, &self.token)
            .send()
            .await
            .context("Failed to request channel messages")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Discord API error while reading messages ({status}): {body}");
        }

        // Messages come newest-first.
        let messages: Vec<DiscordMessage> = response.json().await.context("Failed to parse channel messages")?;
        debug!("Fetched {} messages", messages.len());

        Ok(messages.into_iter().next().map(MessageRecord::from))
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, channel_id: &str, text: &str, reply_to: Option<MessageId>) -> Void {
        let response = self
            .client
            .post(self.url(&format!("/channels/{channel_id}/messages")))
            .header(AUTHORIZATION, &self.token)
            .json(&create_message_body(text, reply_to))
            .send()
            .await
            .context("Failed to send message")?;

        match response.status() {
            StatusCode::CREATED => Ok(()),
            status if status.is_success() => Err(anyhow!("Unexpected status while sending message: {status}")),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(anyhow!("Discord API error while sending message ({status}): {body}"))
            }
        }
    }
}
