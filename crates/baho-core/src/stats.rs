//! Aggregate statistics and month buckets.
//!
//! Nothing here is stored: every aggregate is recomputed from the vote events
//! on read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  staff::{Staff, StaffId},
  vote::VoteKind,
};

// ─── Counts ──────────────────────────────────────────────────────────────────

/// Per-kind vote counts. The total is derived, so it always equals the sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
  pub likes:    u64,
  pub dislikes: u64,
  pub neutrals: u64,
}

impl VoteCounts {
  pub fn total(&self) -> u64 { self.likes + self.dislikes + self.neutrals }

  pub fn get(&self, kind: VoteKind) -> u64 {
    match kind {
      VoteKind::Like => self.likes,
      VoteKind::Neutral => self.neutrals,
      VoteKind::Dislike => self.dislikes,
    }
  }
}

/// A staff record joined with its all-time counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffStats {
  pub staff:  Staff,
  pub counts: VoteCounts,
}

/// Counts for one staff id within a [`Bucket`]. Carries only the id: the
/// staff record may have been deleted since the votes were cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthStats {
  pub staff_id: StaffId,
  pub counts:   VoteCounts,
}

// ─── Bucket ──────────────────────────────────────────────────────────────────

/// A validated calendar month, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
  year:  i32,
  month: u32,
  start: DateTime<Utc>,
  end:   DateTime<Utc>,
}

impl Bucket {
  pub fn new(year: i32, month: u32) -> Result<Self> {
    let invalid = || Error::InvalidBucket { year, month };

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
      NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
      NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;

    Ok(Self {
      year,
      month,
      start: first.and_time(chrono::NaiveTime::MIN).and_utc(),
      end: next.and_time(chrono::NaiveTime::MIN).and_utc(),
    })
  }

  pub fn year(&self) -> i32 { self.year }

  pub fn month(&self) -> u32 { self.month }

  /// Inclusive lower bound of the month.
  pub fn start(&self) -> DateTime<Utc> { self.start }

  /// Exclusive upper bound of the month.
  pub fn end(&self) -> DateTime<Utc> { self.end }

  pub fn contains(&self, at: DateTime<Utc>) -> bool {
    self.start <= at && at < self.end
  }
}
