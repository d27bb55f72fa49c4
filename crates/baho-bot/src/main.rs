//! baho-bot binary.
//!
//! Reads `bot.toml` (or the path specified with `--config`) layered under
//! `BAHO_*` environment variables and runs the bot with long polling.

use std::path::PathBuf;

use anyhow::Context as _;
use baho_bot::{BotConfig, VoteClient, handlers};
use clap::Parser;
use teloxide::prelude::*;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Baho Telegram rating bot")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "bot.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let config = BotConfig::load(&cli.config).context("failed to load bot configuration")?;

  let client = VoteClient::new(&config.api_base, config.request_timeout())
    .context("failed to build HTTP client")?;
  let bot = Bot::new(&config.bot_token);

  tracing::info!(api_base = %config.api_base, "starting bot");
  Dispatcher::builder(bot, handlers::schema())
    .dependencies(dptree::deps![client])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

  Ok(())
}
