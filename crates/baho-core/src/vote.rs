//! Vote events and the closed set of vote kinds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Error, Result, staff::StaffId};

/// The rating a user gave. The lowercase literal is both the wire form
/// (`/vote/{id}/{kind}`, bot callback data) and the stored column value.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VoteKind {
  Like,
  Neutral,
  Dislike,
}

impl VoteKind {
  /// Parse a wire literal, rejecting anything outside the closed set.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse()
      .map_err(|_| Error::InvalidVoteKind(s.to_owned()))
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Like => "like",
      Self::Neutral => "neutral",
      Self::Dislike => "dislike",
    }
  }
}

/// One timestamped rating submission. Append-only; removed only by the
/// explicit bulk resets on [`crate::store::RatingStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
  pub vote_id:    i64,
  pub staff_id:   StaffId,
  pub kind:       VoteKind,
  /// Store-assigned at insert time; drives month bucketing.
  pub created_at: DateTime<Utc>,
}
