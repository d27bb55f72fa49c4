//! Admin login, password changes and the session extractor.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use baho_core::store::RatingStore;
use rand_core::OsRng;
use tokio::sync::RwLock;

use crate::{
  AppState,
  error::Error,
  session::{SESSION_COOKIE, Session, SessionManager},
  settings::{AdminCredentials, CredentialStore},
};

/// Verify `password` against an argon2 PHC string. A malformed hash never
/// verifies.
pub fn verify_password(password_hash: &str, password: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(password_hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// Hash `password` into an argon2 PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Password(e.to_string()))
}

/// Outcome of [`AuthState::change_password`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordChange {
  Changed,
  WrongCurrentPassword,
}

/// Credentials, their persistence, and the live sessions.
pub struct AuthState {
  credentials: RwLock<AdminCredentials>,
  persist:     Arc<dyn CredentialStore>,
  pub sessions: SessionManager,
}

impl AuthState {
  pub fn new(
    credentials: AdminCredentials,
    persist: Arc<dyn CredentialStore>,
    sessions: SessionManager,
  ) -> Self {
    Self { credentials: RwLock::new(credentials), persist, sessions }
  }

  pub async fn username(&self) -> String {
    self.credentials.read().await.username.clone()
  }

  /// Check the credentials and, if they match, issue a session token.
  pub async fn login(&self, username: &str, password: &str) -> Option<String> {
    let credentials = self.credentials.read().await;
    if username != credentials.username
      || !verify_password(&credentials.password_hash, password)
    {
      return None;
    }
    Some(self.sessions.issue(username))
  }

  /// Replace the admin password after re-checking the current one. The new
  /// hash is persisted before it takes effect in memory.
  pub async fn change_password(
    &self,
    current: &str,
    new: &str,
  ) -> Result<PasswordChange, Error> {
    let mut credentials = self.credentials.write().await;
    if !verify_password(&credentials.password_hash, current) {
      return Ok(PasswordChange::WrongCurrentPassword);
    }

    let updated = AdminCredentials {
      username:      credentials.username.clone(),
      password_hash: hash_password(new)?,
    };
    self.persist.save(&updated)?;
    *credentials = updated;
    Ok(PasswordChange::Changed)
  }
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// Present in a handler's arguments means the request carries a valid admin
/// session. Rejects with [`Error::NotAuthenticated`], i.e. a redirect to the
/// login page.
pub struct AdminSession(pub Session);

/// The session token from the request cookies, if any.
pub fn session_token(jar: &CookieJar) -> Option<String> {
  jar.get(SESSION_COOKIE).map(|c| c.value().to_owned())
}

impl<S> FromRequestParts<AppState<S>> for AdminSession
where
  S: RatingStore + Clone + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = session_token(&jar).ok_or(Error::NotAuthenticated)?;
    state
      .auth
      .sessions
      .validate(&token)
      .map(AdminSession)
      .ok_or(Error::NotAuthenticated)
  }
}
