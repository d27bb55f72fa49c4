//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No valid session; rendered as a redirect to the login page.
  #[error("not authenticated")]
  NotAuthenticated,
  #[error("not found: {0}")]
  NotFound(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("template error: {0}")]
  Template(#[from] askama::Error),
  #[error("report error: {0}")]
  Report(baho_report::Error),
  #[error("qr error: {0}")]
  Qr(#[from] baho_qr::Error),
  #[error("settings error: {0}")]
  Settings(String),
  #[error("password hashing error: {0}")]
  Password(String),
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),
  #[error("background task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Error::Store(Box::new(e))
  }
}

impl From<baho_core::Error> for Error {
  fn from(e: baho_core::Error) -> Self {
    match e {
      baho_core::Error::StaffNotFound(_) => Error::NotFound(e.to_string()),
      baho_core::Error::InvalidVoteKind(_) | baho_core::Error::InvalidBucket { .. } => {
        Error::BadRequest(e.to_string())
      }
    }
  }
}

impl From<baho_report::Error> for Error {
  fn from(e: baho_report::Error) -> Self {
    match e {
      baho_report::Error::Core(core) => core.into(),
      other => Error::Report(other),
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::NotAuthenticated => Redirect::to("/").into_response(),
      Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      other => {
        tracing::error!(error = %other, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
      }
    }
  }
}
