//! Askama page templates. Sources live under `templates/`.

use askama::Template;
use axum::response::Html;
use baho_core::{
  staff::{Staff, StaffId},
  stats::{StaffStats, VoteCounts},
};

use crate::error::Error;

pub fn render(page: &impl Template) -> Result<Html<String>, Error> {
  Ok(Html(page.render()?))
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
  pub error: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "staff_list.html")]
pub struct StaffListPage {
  pub rows:  Vec<StaffStats>,
  pub query: String,
  pub year:  i32,
  pub month: u32,
}

/// Rendered for any id; `staff` is `None` when no record exists.
#[derive(Template)]
#[template(path = "staff_detail.html")]
pub struct StaffDetailPage {
  pub staff_id:  StaffId,
  pub staff:     Option<Staff>,
  pub counts:    VoteCounts,
  pub deep_link: String,
  pub year:      i32,
  pub month:     u32,
}

#[derive(Template)]
#[template(path = "staff_edit.html")]
pub struct StaffEditPage {
  pub staff: Staff,
}

#[derive(Template)]
#[template(path = "qr_view.html")]
pub struct QrViewPage {
  pub staff_id:  StaffId,
  pub deep_link: String,
}

#[derive(Template)]
#[template(path = "password.html")]
pub struct PasswordPage {
  pub error:   Option<&'static str>,
  pub changed: bool,
}
