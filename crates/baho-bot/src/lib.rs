//! Telegram bot that turns staff QR scans into votes.
//!
//! A scanned code opens the bot with a `staff_<id>` start payload; the bot
//! answers with rating buttons and forwards each tap to the admin server's
//! vote API through a [`VoteClient`].

pub mod client;
pub mod handlers;
pub mod payload;

pub use client::VoteClient;

use std::{path::Path, time::Duration};

use serde::Deserialize;

/// Bot configuration, deserialised from `bot.toml` and `BAHO_*` environment
/// variables.
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
  pub bot_token:            String,
  /// Base URL of the admin server's vote API.
  pub api_base:             String,
  pub request_timeout_secs: u64,
}

impl BotConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("api_base", "http://localhost:8001")?
      .set_default("request_timeout_secs", 30)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("BAHO"))
      .build()?
      .try_deserialize()
  }

  pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }
}
