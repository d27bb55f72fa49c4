//! Staff QR codes: the PNG itself and a page embedding it.

use axum::{
  extract::{Path, State},
  http::header,
  response::{Html, IntoResponse, Response},
};
use baho_core::{staff::StaffId, store::RatingStore};
use baho_qr::StaffQr;

use crate::{
  AppState,
  auth::AdminSession,
  error::Error,
  templates::{QrViewPage, render},
};

/// Fetch the cached image, rendering it on a blocking thread if needed.
async fn staff_qr<S: RatingStore>(
  state: &AppState<S>,
  staff_id: StaffId,
) -> Result<StaffQr, Error> {
  let generator = state.qr.clone();
  let bot = state.config.bot_username.clone();
  let qr = tokio::task::spawn_blocking(move || generator.get_or_create(staff_id, &bot)).await??;
  Ok(qr)
}

pub async fn png<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Path(staff_id): Path<StaffId>,
) -> Result<Response, Error>
where
  S: RatingStore + Clone + 'static,
{
  let qr = staff_qr(&state, staff_id).await?;
  let bytes = tokio::fs::read(&qr.path).await?;
  Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

pub async fn view<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Path(staff_id): Path<StaffId>,
) -> Result<Html<String>, Error>
where
  S: RatingStore + Clone + 'static,
{
  let qr = staff_qr(&state, staff_id).await?;
  render(&QrViewPage { staff_id, deep_link: qr.deep_link })
}
