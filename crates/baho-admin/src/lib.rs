//! Admin web panel for Baho.
//!
//! Exposes an axum [`Router`] with the session-protected admin pages, report
//! and QR downloads, and the public vote endpoint used by the bot, backed by
//! any [`RatingStore`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod session;
pub mod settings;
pub mod templates;

pub use error::Error;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router,
  routing::{get, post},
};
use baho_core::store::RatingStore;
use baho_qr::QrGenerator;
use baho_report::ReportBuilder;
use serde::Deserialize;

use auth::AuthState;
use handlers::{export, login, password, qr, reset, staff, vote};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and `BAHO_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub export_dir:          PathBuf,
  pub qr_dir:              PathBuf,
  pub bot_username:        String,
  pub auth_username:       String,
  /// Only consulted when no credentials file exists yet.
  pub auth_password_hash:  Option<String>,
  pub credentials_path:    PathBuf,
  pub session_ttl_minutes: Option<i64>,
}

impl ServerConfig {
  /// Layer defaults, the optional file at `path`, and the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8001)?
      .set_default("store_path", "data.db")?
      .set_default("export_dir", "exports")?
      .set_default("qr_dir", "qr")?
      .set_default("bot_username", "SenBaholash_bot")?
      .set_default("auth_username", "admin")?
      .set_default("credentials_path", "credentials.toml")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("BAHO"))
      .build()?
      .try_deserialize()
  }

  pub fn session_ttl(&self) -> Option<chrono::Duration> {
    self.session_ttl_minutes.map(chrono::Duration::minutes)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: RatingStore> {
  pub store:   Arc<S>,
  pub config:  Arc<ServerConfig>,
  pub auth:    Arc<AuthState>,
  pub reports: Arc<ReportBuilder>,
  pub qr:      Arc<QrGenerator>,
}

impl<S: RatingStore> AppState<S> {
  /// Wire up the report and QR directories from `config`.
  pub fn new(store: S, config: ServerConfig, auth: AuthState) -> Self {
    Self {
      store:   Arc::new(store),
      reports: Arc::new(ReportBuilder::new(&config.export_dir)),
      qr:      Arc::new(QrGenerator::new(&config.qr_dir)),
      config:  Arc::new(config),
      auth:    Arc::new(auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the admin panel and vote API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RatingStore + Clone + 'static,
{
  Router::new()
    .route("/",                                get(login::page::<S>))
    .route("/login",                           post(login::submit::<S>))
    .route("/logout",                          get(login::logout::<S>))
    .route("/admin/staffs",                    get(staff::list::<S>))
    .route("/admin/staff",                     post(staff::create::<S>))
    .route("/admin/staff/{id}",                get(staff::detail::<S>))
    .route("/admin/staff/{id}/edit",           get(staff::edit_form::<S>).post(staff::edit::<S>))
    .route("/admin/staff/{id}/delete",         post(staff::delete::<S>))
    .route("/admin/staff/{id}/reset-votes",    post(reset::staff_votes::<S>))
    .route("/admin/staff/{id}/reset-month",    post(reset::staff_month::<S>))
    .route("/admin/staff/{id}/qr",             get(qr::png::<S>))
    .route("/admin/staff/{id}/qr-view",        get(qr::view::<S>))
    .route("/admin/staff/{id}/excel",          get(export::staff::<S>))
    .route("/admin/export/excel",              get(export::all::<S>))
    .route("/admin/export/excel/month",        get(export::month::<S>))
    .route("/admin/reset-month",               post(reset::month::<S>))
    .route("/admin/reset-votes",               post(reset::all::<S>))
    .route("/admin/password",                  get(password::form).post(password::submit::<S>))
    .route("/vote/{staff_id}/{kind}",          get(vote::record::<S>))
    .route("/health",                          get(vote::health))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use baho_core::{staff::Staff, vote::VoteKind};
  use baho_store_sqlite::SqliteStore;
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  use crate::{
    auth::hash_password,
    session::SessionManager,
    settings::{AdminCredentials, MemoryCredentialStore},
  };

  const FORM: &str = "application/x-www-form-urlencoded";

  fn test_config(dir: &TempDir) -> ServerConfig {
    ServerConfig {
      host:                "127.0.0.1".to_string(),
      port:                8001,
      store_path:          PathBuf::from(":memory:"),
      export_dir:          dir.path().join("exports"),
      qr_dir:              dir.path().join("qr"),
      bot_username:        "TestBot".to_string(),
      auth_username:       "admin".to_string(),
      auth_password_hash:  None,
      credentials_path:    dir.path().join("credentials.toml"),
      session_ttl_minutes: None,
    }
  }

  async fn make_state(dir: &TempDir) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let auth = AuthState::new(
      AdminCredentials {
        username:      "admin".to_string(),
        password_hash: hash_password("secret").unwrap(),
      },
      Arc::new(MemoryCredentialStore::default()),
      SessionManager::new(None),
    );
    AppState::new(store, test_config(dir), auth)
  }

  async fn send(
    state:  &AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    cookie: Option<&str>,
    form:   Option<&str>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
      builder = builder.header(header::COOKIE, cookie);
    }
    let body = match form {
      Some(form) => {
        builder = builder.header(header::CONTENT_TYPE, FORM);
        Body::from(form.to_string())
      }
      None => Body::empty(),
    };
    router(state.clone())
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap()
  }

  async fn body_string(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
  }

  fn location(resp: &Response) -> &str {
    resp.headers().get(header::LOCATION).unwrap().to_str().unwrap()
  }

  /// Log in and return the `name=value` cookie pair.
  async fn login(state: &AppState<SqliteStore>) -> String {
    let resp = send(state, "POST", "/login", None, Some("username=admin&password=secret")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let set_cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
  }

  // ── Auth ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unauthenticated_admin_request_redirects_to_login() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;

    for uri in ["/admin/staffs", "/admin/staff/1", "/admin/export/excel", "/admin/password"] {
      let resp = send(&state, "GET", uri, None, None).await;
      assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
      assert_eq!(location(&resp), "/");
    }

    let resp = send(&state, "POST", "/admin/reset-votes", Some("baho_session=forged"), None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
  }

  #[tokio::test]
  async fn wrong_password_rerenders_login_page() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;

    let resp = send(&state, "POST", "/login", None, Some("username=admin&password=nope")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!resp.headers().contains_key(header::SET_COOKIE));
    assert!(body_string(resp).await.contains("Invalid username or password"));
  }

  #[tokio::test]
  async fn login_sets_cookie_and_redirects_to_staff_list() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;

    let resp = send(&state, "POST", "/login", None, Some("username=admin&password=secret")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/staffs");
    let set_cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with("baho_session="), "{set_cookie}");
    assert!(set_cookie.contains("HttpOnly"), "{set_cookie}");
  }

  #[tokio::test]
  async fn login_page_redirects_when_already_logged_in() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;

    let resp = send(&state, "GET", "/", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/staffs");

    let resp = send(&state, "GET", "/", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn logout_revokes_the_session() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;

    let resp = send(&state, "GET", "/logout", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let resp = send(&state, "GET", "/admin/staffs", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
  }

  // ── Vote API ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn vote_like_increments_likes_by_one() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;

    let resp = send(&state, "GET", "/vote/5/like", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, r#"{"ok":true}"#);

    let counts = state.store.stats_for(5).await.unwrap();
    assert_eq!(counts.likes, 1);
    assert_eq!(counts.total(), 1);
  }

  #[tokio::test]
  async fn vote_with_unknown_kind_records_nothing() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;

    let resp = send(&state, "GET", "/vote/5/bogus", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, r#"{"ok":false}"#);
    assert_eq!(state.store.stats_for(5).await.unwrap().total(), 0);
  }

  #[tokio::test]
  async fn health_reports_ok() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;

    let resp = send(&state, "GET", "/health", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, r#"{"ok":true}"#);
  }

  // ── Staff management ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn added_staff_appears_in_filtered_list() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;

    let resp = send(
      &state,
      "POST",
      "/admin/staff",
      Some(&cookie),
      Some("staff_id=7&name=Aziza+Karimova&position=Cashier&region=Samarkand"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/staffs");

    let resp = send(&state, "GET", "/admin/staffs", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("Aziza Karimova"));

    let resp = send(&state, "GET", "/admin/staffs?q=samark", Some(&cookie), None).await;
    assert!(body_string(resp).await.contains("Aziza Karimova"));

    let resp = send(&state, "GET", "/admin/staffs?q=tashkent", Some(&cookie), None).await;
    assert!(!body_string(resp).await.contains("Aziza Karimova"));
  }

  #[tokio::test]
  async fn blank_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;

    let resp = send(
      &state,
      "POST",
      "/admin/staff",
      Some(&cookie),
      Some("staff_id=7&name=+++&position=Cashier&region=Samarkand"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(state.store.list_staff().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn edit_updates_record_and_keeps_votes() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;
    state.store.upsert_staff(Staff::new(3, "Old", "Clerk", "Bukhara")).await.unwrap();
    state.store.record_vote(3, VoteKind::Like).await.unwrap();

    let resp = send(
      &state,
      "POST",
      "/admin/staff/3/edit",
      Some(&cookie),
      Some("name=New&position=Manager&region=Bukhara"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/staff/3");

    let staff = state.store.get_staff(3).await.unwrap().unwrap();
    assert_eq!(staff.name, "New");
    assert_eq!(staff.position, "Manager");
    assert_eq!(state.store.stats_for(3).await.unwrap().likes, 1);
  }

  #[tokio::test]
  async fn unknown_staff_edit_is_404_but_detail_renders() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;

    let resp = send(&state, "GET", "/admin/staff/42/edit", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&state, "GET", "/admin/staff/42", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("start=staff_42"));
  }

  #[tokio::test]
  async fn delete_staff_removes_its_votes() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;
    state.store.upsert_staff(Staff::new(3, "Ali", "Clerk", "Bukhara")).await.unwrap();
    state.store.record_vote(3, VoteKind::Dislike).await.unwrap();

    let resp = send(&state, "POST", "/admin/staff/3/delete", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/staffs");

    assert!(state.store.get_staff(3).await.unwrap().is_none());
    assert_eq!(state.store.stats_for(3).await.unwrap().total(), 0);
  }

  // ── Resets ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn reset_all_votes_clears_counts() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;
    state.store.record_vote(1, VoteKind::Like).await.unwrap();
    state.store.record_vote(2, VoteKind::Neutral).await.unwrap();

    let resp = send(&state, "POST", "/admin/reset-votes", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(state.store.stats_for(1).await.unwrap().total(), 0);
    assert_eq!(state.store.stats_for(2).await.unwrap().total(), 0);
  }

  #[tokio::test]
  async fn reset_staff_votes_leaves_others() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;
    state.store.record_vote(1, VoteKind::Like).await.unwrap();
    state.store.record_vote(2, VoteKind::Like).await.unwrap();

    let resp = send(&state, "POST", "/admin/staff/1/reset-votes", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/staff/1");
    assert_eq!(state.store.stats_for(1).await.unwrap().total(), 0);
    assert_eq!(state.store.stats_for(2).await.unwrap().total(), 1);
  }

  #[tokio::test]
  async fn reset_month_rejects_invalid_month() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;

    let resp =
      send(&state, "POST", "/admin/reset-month", Some(&cookie), Some("year=2024&month=13")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Downloads ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn all_staff_export_is_an_xlsx_attachment() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;
    state.store.upsert_staff(Staff::new(1, "Ali", "Clerk", "Bukhara")).await.unwrap();

    let resp = send(&state, "GET", "/admin/export/excel", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::CONTENT_TYPE).unwrap(),
      baho_report::XLSX_CONTENT_TYPE
    );
    assert_eq!(
      resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
      "attachment; filename=\"all_staff_report.xlsx\""
    );
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"PK"));
  }

  #[tokio::test]
  async fn month_export_validates_bucket() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;

    let resp =
      send(&state, "GET", "/admin/export/excel/month?year=2024&month=0", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp =
      send(&state, "GET", "/admin/export/excel/month?year=2024&month=3", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
      "attachment; filename=\"month_3_2024.xlsx\""
    );
  }

  #[tokio::test]
  async fn unknown_staff_export_is_404() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;

    let resp = send(&state, "GET", "/admin/staff/99/excel", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn qr_is_served_as_png_and_cached() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;

    let resp = send(&state, "GET", "/admin/staff/5/qr", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"\x89PNG"));
    assert!(dir.path().join("qr").join("staff_5.png").exists());

    let resp = send(&state, "GET", "/admin/staff/5/qr-view", Some(&cookie), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("https://t.me/TestBot?start=staff_5"));
  }

  // ── Password ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn password_change_requires_current_password() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;

    let resp = send(
      &state,
      "POST",
      "/admin/password",
      Some(&cookie),
      Some("current_password=wrong&new_password=fresh&confirm_password=fresh"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("Current password is incorrect"));
    assert!(state.auth.login("admin", "secret").await.is_some());
  }

  #[tokio::test]
  async fn password_change_takes_effect() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;

    let resp = send(
      &state,
      "POST",
      "/admin/password",
      Some(&cookie),
      Some("current_password=secret&new_password=fresh&confirm_password=fresh"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("Password changed"));

    assert!(state.auth.login("admin", "secret").await.is_none());
    assert!(state.auth.login("admin", "fresh").await.is_some());
  }

  #[tokio::test]
  async fn password_confirmation_must_match() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir).await;
    let cookie = login(&state).await;

    let resp = send(
      &state,
      "POST",
      "/admin/password",
      Some(&cookie),
      Some("current_password=secret&new_password=fresh&confirm_password=other"),
    )
    .await;
    assert!(body_string(resp).await.contains("Passwords do not match"));
    assert!(state.auth.login("admin", "secret").await.is_some());
  }

  // ── Configuration ────────────────────────────────────────────────────────────

  #[test]
  fn config_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = 9000\nbot_username = \"OtherBot\"\n").unwrap();

    let config = ServerConfig::load(&path).unwrap();
    assert_eq!(config.port, 9000);
    assert_eq!(config.bot_username, "OtherBot");
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.qr_dir, PathBuf::from("qr"));
    assert!(config.session_ttl().is_none());
  }
}
