//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings truncated to whole seconds,
//! so lexicographic order matches chronological order and month ranges can
//! be compared as text. Vote kinds are stored as their lowercase literal.

use baho_core::{
  staff::Staff,
  stats::VoteCounts,
  vote::{Vote, VoteKind},
};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── VoteKind ────────────────────────────────────────────────────────────────

pub fn encode_kind(kind: VoteKind) -> &'static str { kind.as_str() }

pub fn decode_kind(s: &str) -> Result<VoteKind> { Ok(VoteKind::parse(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `votes` row.
pub struct RawVote {
  pub vote_id:    i64,
  pub staff_id:   i64,
  pub kind:       String,
  pub created_at: String,
}

impl RawVote {
  pub fn into_vote(self) -> Result<Vote> {
    Ok(Vote {
      vote_id:    self.vote_id,
      staff_id:   self.staff_id,
      kind:       decode_kind(&self.kind)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Read a `staff` row laid out as `staff_id, name, position, region` starting
/// at column `at`.
pub fn staff_from_row(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Staff> {
  Ok(Staff {
    staff_id: row.get(at)?,
    name:     row.get(at + 1)?,
    position: row.get(at + 2)?,
    region:   row.get(at + 3)?,
  })
}

/// Read the three count columns produced by [`crate::store`]'s aggregate
/// projection, starting at column `at`.
pub fn counts_from_row(
  row: &rusqlite::Row<'_>,
  at: usize,
) -> rusqlite::Result<VoteCounts> {
  let likes: i64 = row.get(at)?;
  let dislikes: i64 = row.get(at + 1)?;
  let neutrals: i64 = row.get(at + 2)?;
  Ok(VoteCounts {
    likes:    likes.max(0) as u64,
    dislikes: dislikes.max(0) as u64,
    neutrals: neutrals.max(0) as u64,
  })
}
