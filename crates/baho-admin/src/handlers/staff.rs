//! Staff list, detail, create, edit and delete.

use axum::{
  Form,
  extract::{Path, Query, State},
  response::{Html, Redirect},
};
use baho_core::{
  staff::{Staff, StaffId},
  store::RatingStore,
};
use baho_qr::deep_link;
use chrono::{Datelike as _, Utc};
use serde::Deserialize;

use crate::{
  AppState,
  auth::AdminSession,
  error::Error,
  templates::{StaffDetailPage, StaffEditPage, StaffListPage, render},
};

#[derive(Deserialize)]
pub struct ListQuery {
  #[serde(default)]
  pub q: String,
}

#[derive(Deserialize)]
pub struct StaffForm {
  pub staff_id: StaffId,
  pub name:     String,
  pub position: String,
  pub region:   String,
}

/// The edit form; the id comes from the path.
#[derive(Deserialize)]
pub struct EditForm {
  pub name:     String,
  pub position: String,
  pub region:   String,
}

/// Case-insensitive substring match over id, name, position and region.
/// `needle` must already be lowercase; an empty needle matches everything.
pub fn matches_query(staff: &Staff, needle: &str) -> bool {
  needle.is_empty()
    || staff.staff_id.to_string().contains(needle)
    || [&staff.name, &staff.position, &staff.region]
      .iter()
      .any(|field| field.to_lowercase().contains(needle))
}

/// Build a record from form input, trimming every field.
fn staff_from_form(
  staff_id: StaffId,
  name: &str,
  position: &str,
  region: &str,
) -> Result<Staff, Error> {
  let name = name.trim();
  if name.is_empty() {
    return Err(Error::BadRequest("name must not be empty".to_string()));
  }
  Ok(Staff::new(staff_id, name, position.trim(), region.trim()))
}

pub async fn list<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Query(query): Query<ListQuery>,
) -> Result<Html<String>, Error>
where
  S: RatingStore + Clone + 'static,
{
  let needle = query.q.trim().to_lowercase();
  let rows = state
    .store
    .stats_all()
    .await
    .map_err(Error::store)?
    .into_iter()
    .filter(|row| matches_query(&row.staff, &needle))
    .collect();

  let now = Utc::now();
  render(&StaffListPage { rows, query: query.q, year: now.year(), month: now.month() })
}

pub async fn create<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Form(form): Form<StaffForm>,
) -> Result<Redirect, Error>
where
  S: RatingStore + Clone + 'static,
{
  let staff = staff_from_form(form.staff_id, &form.name, &form.position, &form.region)?;
  let staff_id = staff.staff_id;
  state.store.upsert_staff(staff).await.map_err(Error::store)?;
  tracing::info!(staff_id, "staff saved");
  Ok(Redirect::to("/admin/staffs"))
}

pub async fn detail<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Path(staff_id): Path<StaffId>,
) -> Result<Html<String>, Error>
where
  S: RatingStore + Clone + 'static,
{
  let staff = state.store.get_staff(staff_id).await.map_err(Error::store)?;
  let counts = state.store.stats_for(staff_id).await.map_err(Error::store)?;
  let now = Utc::now();

  render(&StaffDetailPage {
    staff_id,
    staff,
    counts,
    deep_link: deep_link(&state.config.bot_username, staff_id),
    year: now.year(),
    month: now.month(),
  })
}

pub async fn edit_form<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Path(staff_id): Path<StaffId>,
) -> Result<Html<String>, Error>
where
  S: RatingStore + Clone + 'static,
{
  let staff = state
    .store
    .get_staff(staff_id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("staff {staff_id} not found")))?;
  render(&StaffEditPage { staff })
}

pub async fn edit<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Path(staff_id): Path<StaffId>,
  Form(form): Form<EditForm>,
) -> Result<Redirect, Error>
where
  S: RatingStore + Clone + 'static,
{
  let staff = staff_from_form(staff_id, &form.name, &form.position, &form.region)?;
  state.store.upsert_staff(staff).await.map_err(Error::store)?;
  tracing::info!(staff_id, "staff updated");
  Ok(Redirect::to(&format!("/admin/staff/{staff_id}")))
}

pub async fn delete<S>(
  _: AdminSession,
  State(state): State<AppState<S>>,
  Path(staff_id): Path<StaffId>,
) -> Result<Redirect, Error>
where
  S: RatingStore + Clone + 'static,
{
  state.store.delete_staff(staff_id).await.map_err(Error::store)?;
  tracing::info!(staff_id, "staff deleted with its votes");
  Ok(Redirect::to("/admin/staffs"))
}
