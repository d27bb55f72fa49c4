//! [`SqliteStore`], the SQLite implementation of [`RatingStore`].

use std::path::Path;

use baho_core::{
  staff::{Staff, StaffId},
  stats::{Bucket, MonthStats, StaffStats, VoteCounts},
  store::RatingStore,
  vote::{Vote, VoteKind},
};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{RawVote, counts_from_row, encode_dt, encode_kind, staff_from_row},
  schema::SCHEMA,
};

/// The per-kind aggregate projection over a `votes v` relation. A macro so it
/// can be spliced into `concat!` query literals.
macro_rules! counts {
  () => {
    "COALESCE(SUM(CASE WHEN v.kind = 'like'    THEN 1 ELSE 0 END), 0),
     COALESCE(SUM(CASE WHEN v.kind = 'dislike' THEN 1 ELSE 0 END), 0),
     COALESCE(SUM(CASE WHEN v.kind = 'neutral' THEN 1 ELSE 0 END), 0)"
  };
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A rating store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Append a vote with a caller-supplied timestamp.
  ///
  /// [`RatingStore::record_vote`] is this with `Utc::now()`; the explicit form
  /// exists for backfills and for exercising month buckets.
  pub async fn record_vote_at(
    &self,
    staff_id: StaffId,
    kind: VoteKind,
    at: DateTime<Utc>,
  ) -> Result<Vote> {
    let kind_str = encode_kind(kind);
    let at_str = encode_dt(at);

    let raw: RawVote = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO votes (staff_id, kind, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![staff_id, kind_str, at_str],
        )?;
        Ok(RawVote {
          vote_id: conn.last_insert_rowid(),
          staff_id,
          kind: kind_str.to_owned(),
          created_at: at_str,
        })
      })
      .await?;

    raw.into_vote()
  }

  /// Every vote event for one staff id, oldest first.
  pub async fn votes_for(&self, staff_id: StaffId) -> Result<Vec<Vote>> {
    let raws: Vec<RawVote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT vote_id, staff_id, kind, created_at
           FROM votes
           WHERE staff_id = ?1
           ORDER BY vote_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![staff_id], |row| {
            Ok(RawVote {
              vote_id:    row.get(0)?,
              staff_id:   row.get(1)?,
              kind:       row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVote::into_vote).collect()
  }
}

// ─── RatingStore impl ────────────────────────────────────────────────────────

impl RatingStore for SqliteStore {
  type Error = crate::Error;

  // ── Staff ─────────────────────────────────────────────────────────────────

  async fn upsert_staff(&self, staff: Staff) -> Result<()> {
    // `ON CONFLICT … DO UPDATE` rather than `INSERT OR REPLACE`: a replace
    // deletes the old row first, which would fire the vote cascade.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO staff (staff_id, name, position, region)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT(staff_id) DO UPDATE SET
             name     = excluded.name,
             position = excluded.position,
             region   = excluded.region",
          rusqlite::params![staff.staff_id, staff.name, staff.position, staff.region],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_staff(&self, staff_id: StaffId) -> Result<Option<Staff>> {
    let staff = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT staff_id, name, position, region FROM staff WHERE staff_id = ?1",
              rusqlite::params![staff_id],
              |row| staff_from_row(row, 0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(staff)
  }

  async fn delete_staff(&self, staff_id: StaffId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM staff WHERE staff_id = ?1",
          rusqlite::params![staff_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_staff(&self) -> Result<Vec<Staff>> {
    let staff = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT staff_id, name, position, region FROM staff ORDER BY staff_id",
        )?;
        let rows = stmt
          .query_map([], |row| staff_from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(staff)
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn record_vote(&self, staff_id: StaffId, kind: VoteKind) -> Result<Vote> {
    self.record_vote_at(staff_id, kind, Utc::now()).await
  }

  // ── Aggregates ────────────────────────────────────────────────────────────

  async fn stats_for(&self, staff_id: StaffId) -> Result<VoteCounts> {
    let counts = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          concat!("SELECT ", counts!(), " FROM votes v WHERE v.staff_id = ?1"),
          rusqlite::params![staff_id],
          |row| counts_from_row(row, 0),
        )?)
      })
      .await?;
    Ok(counts)
  }

  async fn stats_all(&self) -> Result<Vec<StaffStats>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(concat!(
          "SELECT s.staff_id, s.name, s.position, s.region, ",
          counts!(),
          " FROM staff s
            LEFT JOIN votes v ON v.staff_id = s.staff_id
            GROUP BY s.staff_id, s.name, s.position, s.region
            ORDER BY s.staff_id"
        ))?;
        let rows = stmt
          .query_map([], |row| {
            Ok(StaffStats {
              staff:  staff_from_row(row, 0)?,
              counts: counts_from_row(row, 4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn stats_for_month(&self, bucket: Bucket) -> Result<Vec<MonthStats>> {
    let start = encode_dt(bucket.start());
    let end = encode_dt(bucket.end());

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(concat!(
          "SELECT v.staff_id, ",
          counts!(),
          " FROM votes v
            WHERE v.created_at >= ?1 AND v.created_at < ?2
            GROUP BY v.staff_id
            ORDER BY v.staff_id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![start, end], |row| {
            Ok(MonthStats {
              staff_id: row.get(0)?,
              counts:   counts_from_row(row, 1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  // ── Bulk resets ───────────────────────────────────────────────────────────

  async fn delete_votes_in_month(&self, bucket: Bucket) -> Result<usize> {
    let start = encode_dt(bucket.start());
    let end = encode_dt(bucket.end());

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM votes WHERE created_at >= ?1 AND created_at < ?2",
          rusqlite::params![start, end],
        )?)
      })
      .await?;
    Ok(deleted)
  }

  async fn delete_votes_for_staff(&self, staff_id: StaffId) -> Result<usize> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM votes WHERE staff_id = ?1",
          rusqlite::params![staff_id],
        )?)
      })
      .await?;
    Ok(deleted)
  }

  async fn delete_votes_for_staff_in_month(
    &self,
    staff_id: StaffId,
    bucket: Bucket,
  ) -> Result<usize> {
    let start = encode_dt(bucket.start());
    let end = encode_dt(bucket.end());

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM votes
           WHERE staff_id = ?1 AND created_at >= ?2 AND created_at < ?3",
          rusqlite::params![staff_id, start, end],
        )?)
      })
      .await?;
    Ok(deleted)
  }

  async fn delete_all_votes(&self) -> Result<usize> {
    let deleted = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM votes", [])?;
        // Restart AUTOINCREMENT so the next vote gets id 1.
        tx.execute("DELETE FROM sqlite_sequence WHERE name = 'votes'", [])?;
        tx.commit()?;
        Ok(deleted)
      })
      .await?;
    Ok(deleted)
  }
}
