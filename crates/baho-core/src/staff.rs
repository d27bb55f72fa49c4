//! The rateable employee record.

use serde::{Deserialize, Serialize};

/// Caller-supplied staff identifier; doubles as the primary key.
pub type StaffId = i64;

/// One rateable employee. Exists exactly as long as an administrator keeps
/// it; writes are whole-record upserts keyed on `staff_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
  pub staff_id: StaffId,
  pub name:     String,
  pub position: String,
  pub region:   String,
}

impl Staff {
  pub fn new(
    staff_id: StaffId,
    name: impl Into<String>,
    position: impl Into<String>,
    region: impl Into<String>,
  ) -> Self {
    Self {
      staff_id,
      name: name.into(),
      position: position.into(),
      region: region.into(),
    }
  }
}
