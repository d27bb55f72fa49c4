//! Spreadsheet downloads. Reports are regenerated on every request.

use std::path::PathBuf;

use axum::{
  extract::{Path, Query, State},
  http::header,
  response::{IntoResponse, Response},
};
use baho_core::{
  staff::StaffId,
  stats::Bucket,
  store::RatingStore,
};
use baho_report::XLSX_CONTENT_TYPE;
use serde::Deserialize;

use crate::{AppState, auth::AdminSession, error::Error};

#[derive(Deserialize)]
pub struct MonthQuery {
  pub year:  i32,
  pub month: u32,
}

/// Serve a generated report as an attachment named after the file.
async fn attachment(path: PathBuf) -> Result<Response, Error> {
  let bytes = tokio::fs::read(&path).await?;
  let name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  let headers = [
    (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
    (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{name}\"")),
  ];
  Ok((headers, bytes).into_response())
}

pub async fn all<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
) -> Result<Response, Error>
where
  S: RatingStore + Clone + 'static,
{
  let path = state.reports.all_staff_report(state.store.as_ref()).await?;
  attachment(path).await
}

pub async fn staff<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Path(staff_id): Path<StaffId>,
) -> Result<Response, Error>
where
  S: RatingStore + Clone + 'static,
{
  let path = state.reports.staff_report(state.store.as_ref(), staff_id).await?;
  attachment(path).await
}

pub async fn month<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Query(query): Query<MonthQuery>,
) -> Result<Response, Error>
where
  S: RatingStore + Clone + 'static,
{
  let bucket = Bucket::new(query.year, query.month)?;
  let path = state.reports.month_report(state.store.as_ref(), bucket).await?;
  attachment(path).await
}
