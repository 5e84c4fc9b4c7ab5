//! Library root for `chat-autoreply`.
//!
//! Chat-autoreply is a small bot that keeps a chat channel busy:
//! - Polls a channel and replies to each new message from someone else
//! - Generates replies with Gemini, or draws them from a static message pool
//! - Avoids repeating itself by retrying duplicate generated replies
//! - Alternatively, broadcasts random pool messages on a fixed interval
//!
//! The bot talks to Discord for chat and Gemini for generation. Both are behind
//! traits so that other implementations (and mocks) can be swapped in.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, settings::Settings, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the chat client and message pool
/// - Runs the selected loop until it fails or Ctrl-C is received
pub async fn start(config: Config, settings: Settings) -> Void {
    info!("Starting chat-autoreply ...");

    // Start the crypto provider.  An error only means one is already installed.
    let _ = crypto::ring::default_provider().install_default();

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config, settings)?;

    // Start the runtime.
    tokio::select! {
        result = runtime.start() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down ...");
            Ok(())
        }
    }
}
