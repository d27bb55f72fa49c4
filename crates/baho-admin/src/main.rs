//! baho-admin server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `BAHO_*` environment variables, opens an in-process SQLite store, and
//! serves the admin panel and vote API over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `auth_password_hash` in config.toml:
//!
//! ```text
//! cargo run -p baho-admin --bin server -- --hash-password
//! ```
//!
//! Once the password is changed from the panel, the new hash is kept in
//! `credentials_path` and takes precedence over the configured one.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use baho_admin::{
  AppState, ServerConfig,
  auth::{AuthState, hash_password},
  session::SessionManager,
  settings::{AdminCredentials, CredentialStore as _, TomlCredentialStore},
};
use baho_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Baho admin panel and vote API")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
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

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    let hash = hash_password(&password).context("failed to hash password")?;
    println!("{hash}");
    return Ok(());
  }

  let config = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  let store_path = expand_tilde(&config.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Saved credentials win over the configured hash.
  let persist = TomlCredentialStore::new(expand_tilde(&config.credentials_path));
  let credentials = match persist.load().context("failed to read credentials file")? {
    Some(saved) => {
      tracing::info!(path = ?persist.path(), "using saved admin credentials");
      saved
    }
    None => AdminCredentials {
      username:      config.auth_username.clone(),
      password_hash: config
        .auth_password_hash
        .clone()
        .context("auth_password_hash is not set; generate one with --hash-password")?,
    },
  };

  let auth = AuthState::new(
    credentials,
    Arc::new(persist),
    SessionManager::new(config.session_ttl()),
  );

  let address = format!("{}:{}", config.host, config.port);
  let state = AppState::new(store, config, auth);
  let app = baho_admin::router(state).layer(TraceLayer::new_for_http());

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
