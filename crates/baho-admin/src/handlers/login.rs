//! Login page, login form and logout.

use axum::{
  Form,
  extract::State,
  response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use baho_core::store::RatingStore;
use serde::Deserialize;

use crate::{
  AppState,
  auth::session_token,
  error::Error,
  session::{removal_cookie, session_cookie},
  templates::{LoginPage, render},
};

#[derive(Deserialize)]
pub struct LoginForm {
  pub username: String,
  pub password: String,
}

/// The login page, or straight to the staff list for a logged-in browser.
pub async fn page<S>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
) -> Result<Response, Error>
where
  S: RatingStore + Clone + 'static,
{
  let logged_in = session_token(&jar)
    .and_then(|token| state.auth.sessions.validate(&token))
    .is_some();
  if logged_in {
    return Ok(Redirect::to("/admin/staffs").into_response());
  }
  Ok(render(&LoginPage { error: None })?.into_response())
}

pub async fn submit<S>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
  Form(form): Form<LoginForm>,
) -> Result<Response, Error>
where
  S: RatingStore + Clone + 'static,
{
  match state.auth.login(&form.username, &form.password).await {
    Some(token) => {
      tracing::info!(username = %form.username, "admin logged in");
      Ok((jar.add(session_cookie(token)), Redirect::to("/admin/staffs")).into_response())
    }
    None => {
      tracing::warn!(username = %form.username, "failed login attempt");
      let page = LoginPage { error: Some("Invalid username or password") };
      Ok(render(&page)?.into_response())
    }
  }
}

pub async fn logout<S>(
  State(state): State<AppState<S>>,
  jar: CookieJar,
) -> impl IntoResponse
where
  S: RatingStore + Clone + 'static,
{
  if let Some(token) = session_token(&jar) {
    state.auth.sessions.revoke(&token);
  }
  (jar.remove(removal_cookie()), Redirect::to("/"))
}
