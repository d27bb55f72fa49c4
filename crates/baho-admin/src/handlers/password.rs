//! Changing the admin password.

use axum::{
  Form,
  extract::State,
  response::Html,
};
use baho_core::store::RatingStore;
use serde::Deserialize;

use crate::{
  AppState,
  auth::{AdminSession, PasswordChange},
  error::Error,
  templates::{PasswordPage, render},
};

#[derive(Deserialize)]
pub struct PasswordForm {
  pub current_password: String,
  pub new_password:     String,
  pub confirm_password: String,
}

pub async fn form(_: AdminSession) -> Result<Html<String>, Error> {
  render(&PasswordPage { error: None, changed: false })
}

pub async fn submit<S>(
  AdminSession(session): AdminSession,
  State(state): State<AppState<S>>,
  Form(form): Form<PasswordForm>,
) -> Result<Html<String>, Error>
where
  S: RatingStore + Clone + 'static,
{
  let rejected = |error| render(&PasswordPage { error: Some(error), changed: false });

  if form.new_password.is_empty() {
    return rejected("New password must not be empty");
  }
  if form.new_password != form.confirm_password {
    return rejected("Passwords do not match");
  }

  match state.auth.change_password(&form.current_password, &form.new_password).await? {
    PasswordChange::Changed => {
      tracing::info!(username = %session.username, "admin password changed");
      render(&PasswordPage { error: None, changed: true })
    }
    PasswordChange::WrongCurrentPassword => {
      tracing::warn!(username = %session.username, "password change with wrong current password");
      rejected("Current password is incorrect")
    }
  }
}
