//! Persona prompt templates for generated replies.

use crate::base::settings::Language;

/// Persona instruction appended to the incoming message for English replies.
pub const ENGLISH_PERSONA_DIRECTIVE: &str = "Just respond with one sentence in casual, everyday English like a natural conversation, and do not use any symbols or emoji.";

/// Persona instruction appended to the incoming message for Indonesian replies.
pub const INDONESIAN_PERSONA_DIRECTIVE: &str = "Respond with 1 sentence in casual Jakarta-style slang without any symbols.";

/// Get the persona directive for a language.
pub fn persona_directive(language: Language) -> &'static str {
    match language {
        Language::English => ENGLISH_PERSONA_DIRECTIVE,
        Language::Indonesian => INDONESIAN_PERSONA_DIRECTIVE,
    }
}

/// Wrap an incoming chat message in the persona instruction for `language`.
pub fn build_reply_prompt(message: &str, language: Language) -> String {
    format!("{message}\n\n{}", persona_directive(language))
}
