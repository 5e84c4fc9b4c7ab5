//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, path::Path, sync::Arc};

use serde::Deserialize;

use super::{settings::ModeKind, types::Res};

/// Default chat platform REST API base.
fn default_discord_api_base() -> String {
    "https://discord.com/api/v9".to_string()
}

/// Default generative language API base.
fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Default generative model.
fn default_gemini_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

/// Default static message pool file.
fn default_message_pool_path() -> String {
    "messages.txt".to_string()
}

/// Configuration for the auto-reply bot.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// The shared, immutable configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

/// Configuration values, as deserialized from the config sources.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Chat platform token, sent verbatim as the `Authorization` header (`AUTOREPLY_DISCORD_TOKEN` or `DISCORD_TOKEN`).
    pub discord_token: String,
    /// Generative language API key (`AUTOREPLY_GEMINI_API_KEY` or `GOOGLE_API_KEY`).
    /// Only required when replies are generated.
    #[serde(default)]
    pub gemini_api_key: String,
    /// Chat platform REST API base (`AUTOREPLY_DISCORD_API_BASE`).
    #[serde(default = "default_discord_api_base")]
    pub discord_api_base: String,
    /// Generative language API base (`AUTOREPLY_GEMINI_API_BASE`).
    #[serde(default = "default_gemini_api_base")]
    pub gemini_api_base: String,
    /// Generative model name (`AUTOREPLY_GEMINI_MODEL`).
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// Path of the line-delimited static message pool (`AUTOREPLY_MESSAGE_POOL_PATH`).
    #[serde(default = "default_message_pool_path")]
    pub message_pool_path: String,

    // Run settings.  Anything left unset here is asked for at startup.
    /// `auto_reply` or `broadcast` (`AUTOREPLY_MODE`).
    pub mode: Option<ModeKind>,
    /// Channel to watch and post into (`AUTOREPLY_CHANNEL_ID`).
    pub channel_id: Option<String>,
    /// Generate replies with the generative API (`AUTOREPLY_USE_GENERATIVE_AI`).
    pub use_generative_ai: Option<bool>,
    /// Reply with lines from the static pool; takes priority over generation (`AUTOREPLY_USE_STATIC_POOL`).
    pub use_static_pool: Option<bool>,
    /// Link replies to the triggering message (`AUTOREPLY_REPLY_MODE`).
    pub reply_mode: Option<bool>,
    /// Reply language code, `en` or `id` (`AUTOREPLY_LANGUAGE`).
    pub language: Option<String>,
    /// Seconds between polls (`AUTOREPLY_READ_DELAY`).
    pub read_delay: Option<u64>,
    /// Seconds between receiving a message and replying (`AUTOREPLY_REPLY_DELAY`).
    pub reply_delay: Option<u64>,
    /// Seconds between broadcast messages (`AUTOREPLY_SEND_INTERVAL`).
    pub send_interval: Option<u64>,
    /// Send the apology reply when generation fails, instead of skipping (`AUTOREPLY_FALLBACK_ON_ERROR`).
    pub fallback_on_error: Option<bool>,
}

impl Config {
    /// Load configuration from the bare secret variables, the config file, and `AUTOREPLY_*` env.
    pub fn load(explicit_path: Option<&Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        // The bare variable names are accepted as low-priority defaults.
        if let Ok(token) = std::env::var("DISCORD_TOKEN") {
            cfg = cfg.set_default("discord_token", token)?;
        }

        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            cfg = cfg.set_default("gemini_api_key", key)?;
        }

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        cfg = cfg.add_source(config::Environment::default().prefix("AUTOREPLY").try_parsing(true));

        Self::build(cfg)
    }

    /// Deserialize and validate the layered sources.
    fn build(cfg: config::ConfigBuilder<config::builder::DefaultState>) -> Res<Self> {
        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        if result.discord_token.trim().is_empty() {
            return Err(anyhow::anyhow!("The chat platform token must not be empty."));
        }

        if let Some(channel_id) = &result.channel_id
            && channel_id.trim().is_empty()
        {
            return Err(anyhow::anyhow!("The channel id must not be empty."));
        }

        Ok(result)
    }
}
