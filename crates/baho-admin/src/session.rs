//! Server-side login sessions.
//!
//! A successful login produces a [`Session`] stored under a random token; the
//! token travels in the [`SESSION_COOKIE`] cookie. Sessions live in memory, so
//! a restart logs everyone out.

use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand_core::{OsRng, RngCore as _};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "baho_session";

/// Token length in random bytes (hex-encoded on the wire).
const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub username:      String,
  pub authenticated: bool,
  pub issued_at:     DateTime<Utc>,
}

impl Session {
  /// Whether the session still grants access at `now`.
  pub fn is_valid(&self, now: DateTime<Utc>, ttl: Option<Duration>) -> bool {
    self.authenticated && ttl.is_none_or(|ttl| now - self.issued_at < ttl)
  }
}

/// Issues, validates and revokes sessions.
#[derive(Debug, Default)]
pub struct SessionManager {
  sessions: DashMap<String, Session>,
  ttl:      Option<Duration>,
}

impl SessionManager {
  pub fn new(ttl: Option<Duration>) -> Self {
    Self { sessions: DashMap::new(), ttl }
  }

  /// Start an authenticated session for `username` and return its token.
  pub fn issue(&self, username: &str) -> String {
    let token = new_token();
    self.sessions.insert(token.clone(), Session {
      username:      username.to_owned(),
      authenticated: true,
      issued_at:     Utc::now(),
    });
    token
  }

  /// Look up a token. Expired sessions are dropped on sight.
  pub fn validate(&self, token: &str) -> Option<Session> {
    self.validate_at(token, Utc::now())
  }

  fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
    // Clone out before removing: holding a map guard across `remove` would
    // deadlock the shard.
    let session = self.sessions.get(token).map(|s| s.clone())?;
    if session.is_valid(now, self.ttl) {
      Some(session)
    } else {
      self.sessions.remove(token);
      None
    }
  }

  pub fn revoke(&self, token: &str) { self.sessions.remove(token); }

  pub fn len(&self) -> usize { self.sessions.len() }

  pub fn is_empty(&self) -> bool { self.sessions.is_empty() }
}

/// The cookie handed out on login.
pub fn session_cookie(token: String) -> Cookie<'static> {
  Cookie::build((SESSION_COOKIE, token))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .build()
}

/// A cookie matching [`session_cookie`]'s path, for removal on logout.
pub fn removal_cookie() -> Cookie<'static> {
  Cookie::build(SESSION_COOKIE).path("/").build()
}

fn new_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}
