//! Static message pool backed by a line-delimited text file.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use rand::seq::IndexedRandom;
use tracing::{instrument, warn};

use crate::base::config::Config;

/// Returned when the pool file exists but holds no usable lines.
pub const EMPTY_POOL_MESSAGE: &str = "No available messages.";

/// Returned when the pool file cannot be found.
pub const MISSING_POOL_MESSAGE: &str = "Message pool file not found.";

/// A pool of canned messages, one per line.
///
/// The file is read on every draw, so it can be edited while the bot runs.
#[derive(Debug, Clone)]
pub struct MessagePool {
    path: PathBuf,
}

impl MessagePool {
    /// A pool backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A pool backed by the configured `message_pool_path`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.message_pool_path)
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Draw one uniformly random non-blank line.
    ///
    /// A missing, unreadable or empty file is not an error; a fixed fallback message is returned instead.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn draw(&self) -> String {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Message pool file not found.");
                return MISSING_POOL_MESSAGE.to_string();
            }
            Err(e) => {
                warn!("Failed to read message pool: {}", e);
                return MISSING_POOL_MESSAGE.to_string();
            }
        };

        let lines: Vec<&str> = contents.lines().map(str::trim).filter(|line| !line.is_empty()).collect();

        match lines.choose(&mut rand::rng()) {
            Some(line) => line.to_string(),
            None => {
                warn!("Message pool file is empty.");
                EMPTY_POOL_MESSAGE.to_string()
            }
        }
    }
}
