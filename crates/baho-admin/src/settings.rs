//! Persistence for the admin credentials.
//!
//! Credentials are loaded once at startup. A password change goes through a
//! [`CredentialStore`], which writes a dedicated file; the main configuration
//! file is never rewritten.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Where changed credentials are persisted.
pub trait CredentialStore: Send + Sync {
  /// Previously saved credentials, if any.
  fn load(&self) -> Result<Option<AdminCredentials>, Error>;

  fn save(&self, credentials: &AdminCredentials) -> Result<(), Error>;
}

/// Stores credentials as a small TOML file.
#[derive(Debug, Clone)]
pub struct TomlCredentialStore {
  path: PathBuf,
}

impl TomlCredentialStore {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }
}

impl CredentialStore for TomlCredentialStore {
  fn load(&self) -> Result<Option<AdminCredentials>, Error> {
    if !self.path.exists() {
      return Ok(None);
    }
    let raw = std::fs::read_to_string(&self.path)?;
    let credentials = toml::from_str(&raw).map_err(|e| {
      Error::Settings(format!("parsing {}: {e}", self.path.display()))
    })?;
    Ok(Some(credentials))
  }

  fn save(&self, credentials: &AdminCredentials) -> Result<(), Error> {
    let raw = toml::to_string_pretty(credentials)
      .map_err(|e| Error::Settings(e.to_string()))?;

    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }

    // Write then rename so a crash never leaves a truncated file behind.
    let tmp = self.path.with_extension("toml.tmp");
    std::fs::write(&tmp, raw)?;
    std::fs::rename(&tmp, &self.path)?;
    Ok(())
  }
}

/// In-memory credential store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
  saved: std::sync::Mutex<Option<AdminCredentials>>,
}

#[cfg(test)]
impl CredentialStore for MemoryCredentialStore {
  fn load(&self) -> Result<Option<AdminCredentials>, Error> {
    Ok(self.saved.lock().unwrap().clone())
  }

  fn save(&self, credentials: &AdminCredentials) -> Result<(), Error> {
    *self.saved.lock().unwrap() = Some(credentials.clone());
    Ok(())
  }
}
