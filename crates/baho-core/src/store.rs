//! The `RatingStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `baho-store-sqlite`).
//! Higher layers (`baho-admin`, `baho-report`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  staff::{Staff, StaffId},
  stats::{Bucket, MonthStats, StaffStats, VoteCounts},
  vote::{Vote, VoteKind},
};

/// Abstraction over a rating store backend.
///
/// Every method is one independently committed unit of work; nothing spans
/// two calls. All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RatingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Staff ─────────────────────────────────────────────────────────────

  /// Insert the record, or fully replace the one with the same id.
  fn upsert_staff(
    &self,
    staff: Staff,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve one record. Returns `None` if not found.
  fn get_staff(
    &self,
    staff_id: StaffId,
  ) -> impl Future<Output = Result<Option<Staff>, Self::Error>> + Send + '_;

  /// Remove the record and every vote cast for it. Unknown ids are a no-op.
  fn delete_staff(
    &self,
    staff_id: StaffId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All records, ordered by id ascending.
  fn list_staff(
    &self,
  ) -> impl Future<Output = Result<Vec<Staff>, Self::Error>> + Send + '_;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Append one vote stamped with the current time. The staff id is not
  /// checked against the staff table.
  fn record_vote(
    &self,
    staff_id: StaffId,
    kind: VoteKind,
  ) -> impl Future<Output = Result<Vote, Self::Error>> + Send + '_;

  // ── Aggregates ────────────────────────────────────────────────────────

  /// All-time counts for one id; zero-filled when it has no votes.
  fn stats_for(
    &self,
    staff_id: StaffId,
  ) -> impl Future<Output = Result<VoteCounts, Self::Error>> + Send + '_;

  /// One row per staff record, including records with no votes, ordered by
  /// id.
  fn stats_all(
    &self,
  ) -> impl Future<Output = Result<Vec<StaffStats>, Self::Error>> + Send + '_;

  /// One row per staff id with at least one vote in `bucket`, ordered by id.
  /// Ids without votes that month are omitted.
  fn stats_for_month(
    &self,
    bucket: Bucket,
  ) -> impl Future<Output = Result<Vec<MonthStats>, Self::Error>> + Send + '_;

  // ── Bulk resets ───────────────────────────────────────────────────────
  //
  // Irreversible. Each returns the number of vote events removed.

  fn delete_votes_in_month(
    &self,
    bucket: Bucket,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  fn delete_votes_for_staff(
    &self,
    staff_id: StaffId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  fn delete_votes_for_staff_in_month(
    &self,
    staff_id: StaffId,
    bucket: Bucket,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Remove every vote and restart vote ids from 1.
  fn delete_all_votes(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
