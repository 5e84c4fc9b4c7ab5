//! Reply generation with duplicate avoidance.
//!
//! Generated replies are compared against the previous one.  A repeat is treated as
//! a stuck generator and retried, up to [`MAX_ATTEMPTS`] calls in total.

use tracing::{info, instrument, warn};

use crate::{
    base::{
        prompts::build_reply_prompt,
        settings::{Language, ReplyConfig, ReplySource},
        types::{APOLOGY_REPLY, LastSeenState, Res},
    },
    service::{llm::LlmClient, pool::MessagePool},
};

/// Total number of generative calls made for one incoming message.
pub const MAX_ATTEMPTS: u32 = 3;

/// Result of judging one generated candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The candidate differs from the last reply.
    Success(String),
    /// The candidate repeats the last reply and attempts remain.
    Retry,
    /// The candidate repeats the last reply and no attempts remain.
    Exhausted,
}

/// Judge the candidate produced by attempt number `attempt` (starting at 1).
pub fn next_outcome(attempt: u32, candidate: String, last_reply: Option<&str>) -> AttemptOutcome {
    if last_reply != Some(candidate.as_str()) {
        AttemptOutcome::Success(candidate)
    } else if attempt < MAX_ATTEMPTS {
        AttemptOutcome::Retry
    } else {
        AttemptOutcome::Exhausted
    }
}

/// Produces reply text for incoming messages.
#[derive(Clone)]
pub enum ReplyGenerator {
    /// Draw a random line from the static pool.
    StaticPool(MessagePool),
    /// Ask the generative service, with a persona prompt in `language`.
    Generative { llm: LlmClient, language: Language },
}

impl ReplyGenerator {
    /// Build the generator selected by `config`.
    ///
    /// `llm` is only called upon when generation is selected.
    pub fn from_config(config: &ReplyConfig, pool: MessagePool, llm: impl FnOnce() -> Res<LlmClient>) -> Res<Self> {
        Ok(match config.source() {
            ReplySource::StaticPool => Self::StaticPool(pool),
            ReplySource::Generative => Self::Generative { llm: llm()?, language: config.language },
        })
    }

    /// Generate a reply to `message`.
    ///
    /// Errors only when the generative service fails; the attempt loop stops at the first failure.
    #[instrument(skip_all)]
    pub async fn generate(&self, message: &str, state: &mut LastSeenState) -> Res<String> {
        match self {
            Self::StaticPool(pool) => {
                info!("Using a message from the pool as reply.");
                Ok(pool.draw().await)
            }
            Self::Generative { llm, language } => generate_distinct(llm, &build_reply_prompt(message, *language), state).await,
        }
    }
}

/// Call the service until it returns something other than the last reply.
async fn generate_distinct(llm: &LlmClient, prompt: &str, state: &mut LastSeenState) -> Res<String> {
    let mut attempt = 1;

    loop {
        let candidate = llm.generate_text(prompt).await?;

        match next_outcome(attempt, candidate, state.last_reply_text.as_deref()) {
            AttemptOutcome::Success(text) => {
                state.last_reply_text = Some(text.clone());
                return Ok(text);
            }
            AttemptOutcome::Retry => {
                warn!("Generator repeated its last reply, retrying (attempt {attempt} of {MAX_ATTEMPTS}) ...");
                attempt += 1;
            }
            AttemptOutcome::Exhausted => {
                warn!("Generator keeps repeating its last reply, reusing it.");
                return Ok(state.last_reply_text.clone().unwrap_or_else(|| APOLOGY_REPLY.to_string()));
            }
        }
    }
}
