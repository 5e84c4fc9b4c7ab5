//! The bot's loops and the pieces they are built from.
//!
//! This module provides:
//! - Reply generation from the static pool or the generative service
//! - Sending messages with optional reply references
//! - The poll-generate-reply loop
//! - The no-poll broadcast loop

pub mod broadcast;
pub mod poll_loop;
pub mod reply;
pub mod sender;
