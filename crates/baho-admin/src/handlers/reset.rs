//! Bulk vote resets. All of them are irreversible.

use axum::{
  Form,
  extract::{Path, State},
  response::Redirect,
};
use baho_core::{
  staff::StaffId,
  stats::Bucket,
  store::RatingStore,
};
use serde::Deserialize;

use crate::{AppState, auth::AdminSession, error::Error};

#[derive(Deserialize)]
pub struct MonthForm {
  pub year:  i32,
  pub month: u32,
}

impl MonthForm {
  fn bucket(&self) -> Result<Bucket, Error> { Ok(Bucket::new(self.year, self.month)?) }
}

fn detail_page(staff_id: StaffId) -> Redirect {
  Redirect::to(&format!("/admin/staff/{staff_id}"))
}

/// Delete every vote and restart vote ids.
pub async fn all<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
) -> Result<Redirect, Error>
where
  S: RatingStore + Clone + 'static,
{
  let removed = state.store.delete_all_votes().await.map_err(Error::store)?;
  tracing::warn!(removed, "all votes reset");
  Ok(Redirect::to("/admin/staffs"))
}

/// Delete every vote cast in one month.
pub async fn month<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Form(form): Form<MonthForm>,
) -> Result<Redirect, Error>
where
  S: RatingStore + Clone + 'static,
{
  let bucket = form.bucket()?;
  let removed = state.store.delete_votes_in_month(bucket).await.map_err(Error::store)?;
  tracing::warn!(removed, year = bucket.year(), month = bucket.month(), "month votes reset");
  Ok(Redirect::to("/admin/staffs"))
}

pub async fn staff_votes<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Path(staff_id): Path<StaffId>,
) -> Result<Redirect, Error>
where
  S: RatingStore + Clone + 'static,
{
  let removed = state.store.delete_votes_for_staff(staff_id).await.map_err(Error::store)?;
  tracing::warn!(staff_id, removed, "staff votes reset");
  Ok(detail_page(staff_id))
}

pub async fn staff_month<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Path(staff_id): Path<StaffId>,
  Form(form): Form<MonthForm>,
) -> Result<Redirect, Error>
where
  S: RatingStore + Clone + 'static,
{
  let bucket = form.bucket()?;
  let removed = state
    .store
    .delete_votes_for_staff_in_month(staff_id, bucket)
    .await
    .map_err(Error::store)?;
  tracing::warn!(
    staff_id,
    removed,
    year = bucket.year(),
    month = bucket.month(),
    "staff month votes reset"
  );
  Ok(detail_page(staff_id))
}
