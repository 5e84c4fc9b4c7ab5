//! Core components, types, and utilities for the auto-reply bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Run settings gathered at startup.
//! - Persona prompts for generated replies.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod settings;
pub mod types;
