//! Run settings, resolved once at startup.
//!
//! Values come from [`Config`] first; anything left unset is asked for on the
//! terminal through a [`Prompt`].  The resulting [`Settings`] is immutable for the
//! lifetime of the process.

use std::{
    fmt,
    io::{BufRead, Write},
    time::Duration,
};

use anyhow::{Context, anyhow, bail};
use serde::Deserialize;
use tracing::warn;

use super::{config::Config, types::Res};

// Enums.

/// Which loop the bot runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    /// Poll the channel and reply to new messages.
    AutoReply,
    /// Send random pool messages on an interval, without polling.
    Broadcast,
}

/// Reply language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Replies in English (`en`).
    #[default]
    English,
    /// Replies in Indonesian (`id`).
    Indonesian,
}

impl Language {
    /// Parse a language code (`en` or `id`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::English),
            "id" => Some(Self::Indonesian),
            _ => None,
        }
    }

    /// Parse a language code, falling back to English on anything unknown.
    pub fn from_code_or_default(code: &str) -> Self {
        Self::from_code(code).unwrap_or_else(|| {
            warn!("Invalid language `{}`, defaulting to English.", code.trim());
            Self::default()
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => write!(f, "English"),
            Self::Indonesian => write!(f, "Indonesian"),
        }
    }
}

/// Where reply text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// A random line from the message pool.
    StaticPool,
    /// Text from the generative service.
    Generative,
}

// Structs.

/// Configuration of the reply loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyConfig {
    /// Generate replies with the generative service.
    pub use_generative_ai: bool,
    /// Reply with pool lines; takes priority over generation.
    pub use_static_pool: bool,
    /// Link each reply to the message that triggered it.
    pub reply_mode: bool,
    /// Persona language for generated replies.
    pub language: Language,
    /// Wait after every poll.
    pub read_delay: Duration,
    /// Wait between receiving a message and sending the reply.
    pub reply_delay: Duration,
    /// Send [`APOLOGY_REPLY`](super::types::APOLOGY_REPLY) when generation fails, rather than nothing.
    pub fallback_on_error: bool,
}

impl ReplyConfig {
    /// The static pool wins when selected, and is also used when generation is off.
    pub fn source(&self) -> ReplySource {
        if self.use_static_pool || !self.use_generative_ai { ReplySource::StaticPool } else { ReplySource::Generative }
    }
}

/// The resolved mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Poll the channel and reply.
    AutoReply(ReplyConfig),
    /// Send pool lines every `send_interval`.
    Broadcast {
        /// Wait between two broadcast messages.
        send_interval: Duration,
    },
}

/// Everything the runtime needs to start a loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// The channel to read from and post into.
    pub channel_id: String,
    /// The loop to run.
    pub mode: Mode,
}

// Prompts.

/// Source of answers for settings missing from config.
pub trait Prompt {
    /// Ask for the value of `key` with a human readable question.
    fn ask(&mut self, key: &str, question: &str) -> Res<String>;
}

/// Asks questions on a line-oriented terminal.
pub struct TerminalPrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    /// Prompt on `writer`, reading answers line by line from `reader`.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl TerminalPrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt on the process stdin / stdout.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn ask(&mut self, key: &str, question: &str) -> Res<String> {
        write!(self.writer, "{question} ")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            bail!("Input closed while asking for `{key}`.");
        }

        Ok(line.trim().to_string())
    }
}

/// Refuses to ask anything; used with `--non-interactive`.
pub struct NoPrompt;

impl Prompt for NoPrompt {
    fn ask(&mut self, key: &str, _question: &str) -> Res<String> {
        Err(anyhow!("`{key}` is not configured and interactive prompts are disabled."))
    }
}

// Resolution.

impl Settings {
    /// Resolve run settings from config, asking for whatever is missing.
    pub fn resolve(config: &Config, prompt: &mut dyn Prompt) -> Res<Self> {
        let auto_reply = match config.mode {
            Some(kind) => kind == ModeKind::AutoReply,
            None => answer_flag(prompt, None, "mode", "Do you want to use the auto-reply feature? (y/n):", "y")?,
        };

        let channel_id = match &config.channel_id {
            Some(id) => id.trim().to_string(),
            None => prompt.ask("channel_id", "Enter the channel ID:")?,
        };

        if channel_id.is_empty() {
            bail!("The channel id must not be empty.");
        }

        if !auto_reply {
            let send_interval = answer_seconds(prompt, config.send_interval, "send_interval", "Set the interval for sending messages (in seconds):")?;

            return Ok(Self {
                channel_id,
                mode: Mode::Broadcast { send_interval },
            });
        }

        let use_generative_ai = answer_flag(prompt, config.use_generative_ai, "use_generative_ai", "Use Google Gemini AI for replies? (y/n):", "y")?;
        let use_static_pool = answer_flag(prompt, config.use_static_pool, "use_static_pool", &format!("Use messages from the '{}' file? (y/n):", config.message_pool_path), "y")?;
        let reply_mode = answer_flag(prompt, config.reply_mode, "reply_mode", "Do you want to reply to messages or just send messages? (reply/send):", "reply")?;

        let language = match &config.language {
            Some(code) => Language::from_code_or_default(code),
            None => Language::from_code_or_default(&prompt.ask("language", "Choose a language for the reply (id/en):")?),
        };

        let read_delay = answer_seconds(prompt, config.read_delay, "read_delay", "Set delay for reading new messages (in seconds):")?;
        let reply_delay = answer_seconds(prompt, config.reply_delay, "reply_delay", "Set delay for replying to messages (in seconds):")?;

        let reply = ReplyConfig {
            use_generative_ai,
            use_static_pool,
            reply_mode,
            language,
            read_delay,
            reply_delay,
            fallback_on_error: config.fallback_on_error.unwrap_or(true),
        };

        if reply.source() == ReplySource::Generative && config.gemini_api_key.trim().is_empty() {
            bail!("Generated replies need a generative API key (`GOOGLE_API_KEY` or `AUTOREPLY_GEMINI_API_KEY`).");
        }

        Ok(Self {
            channel_id,
            mode: Mode::AutoReply(reply),
        })
    }
}

/// Use the configured flag, or ask and compare the answer to `yes`.
fn answer_flag(prompt: &mut dyn Prompt, configured: Option<bool>, key: &str, question: &str, yes: &str) -> Res<bool> {
    match configured {
        Some(value) => Ok(value),
        None => Ok(prompt.ask(key, question)?.eq_ignore_ascii_case(yes)),
    }
}

/// Use the configured number of seconds, or ask for one.
fn answer_seconds(prompt: &mut dyn Prompt, configured: Option<u64>, key: &str, question: &str) -> Res<Duration> {
    let seconds = match configured {
        Some(value) => value,
        None => {
            let answer = prompt.ask(key, question)?;
            answer.parse::<u64>().with_context(|| format!("`{answer}` is not a whole number of seconds for `{key}`."))?
        }
    };

    Ok(Duration::from_secs(seconds))
}
