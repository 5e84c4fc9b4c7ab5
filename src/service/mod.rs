//! Service integrations for external APIs and resources.
//!
//! This module contains implementations for the services used by the bot:
//! - Chat services (e.g., Discord)
//! - LLM services (e.g., Gemini)
//! - The static message pool
//!
//! The chat and LLM modules define both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod llm;
pub mod pool;
