//! Start payloads and inline-button callback data.

use baho_core::{staff::StaffId, vote::VoteKind};

const START_PREFIX: &str = "staff_";
const CALLBACK_PREFIX: &str = "vote";

/// The staff id carried by a `/start staff_<id>` deep link. Anything else,
/// including a non-numeric id, yields `None`.
pub fn parse_start_payload(payload: &str) -> Option<StaffId> {
  payload.trim().strip_prefix(START_PREFIX)?.parse().ok()
}

/// What a rating button sends back: `vote:<id>:<kind>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackData {
  pub staff_id: StaffId,
  pub kind:     VoteKind,
}

impl CallbackData {
  pub fn new(staff_id: StaffId, kind: VoteKind) -> Self { Self { staff_id, kind } }

  pub fn encode(&self) -> String {
    format!("{CALLBACK_PREFIX}:{}:{}", self.staff_id, self.kind.as_str())
  }

  pub fn parse(data: &str) -> Option<Self> {
    let mut parts = data.split(':');
    if parts.next()? != CALLBACK_PREFIX {
      return None;
    }
    let staff_id = parts.next()?.parse().ok()?;
    let kind = VoteKind::parse(parts.next()?).ok()?;
    if parts.next().is_some() {
      return None;
    }
    Some(Self { staff_id, kind })
  }
}
