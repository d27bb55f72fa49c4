//! Spreadsheet exports of rating statistics.
//!
//! Each entry point reads a snapshot from a [`RatingStore`], lays it out as a
//! header plus one row per staff member, and writes an `.xlsx` file with a
//! deterministic name into the export directory. A previous file of the same
//! name is overwritten.
//!
//! | Entry point | File |
//! |-------------|------|
//! | [`ReportBuilder::all_staff_report`] | `all_staff_report.xlsx` |
//! | [`ReportBuilder::staff_report`] | `staff_<id>_report.xlsx` |
//! | [`ReportBuilder::month_report`] | `month_<m>_<y>.xlsx` |

pub mod sheet;

use std::path::{Path, PathBuf};

use baho_core::{staff::StaffId, stats::Bucket, store::RatingStore};
use chrono::Utc;
use thiserror::Error;

use sheet::{DATED_HEADERS, MONTH_HEADERS, Stamp, Table, dated_row, month_rows};

/// MIME type of the generated workbooks.
pub const XLSX_CONTENT_TYPE: &str =
  "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] baho_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("xlsx error: {0}")]
  Xlsx(#[from] rust_xlsxwriter::XlsxError),

  #[error("report task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Store(Box::new(e))
}

/// Writes reports into a fixed export directory.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
  export_dir: PathBuf,
}

impl ReportBuilder {
  pub fn new(export_dir: impl Into<PathBuf>) -> Self {
    Self { export_dir: export_dir.into() }
  }

  pub fn export_dir(&self) -> &Path { &self.export_dir }

  /// Every staff record with all-time counts, including zero-vote staff.
  pub async fn all_staff_report<S: RatingStore>(&self, store: &S) -> Result<PathBuf> {
    let stats = store.stats_all().await.map_err(store_err)?;
    let stamp = Stamp::at(Utc::now());

    let table = Table {
      sheet:   "All Staff".to_owned(),
      headers: DATED_HEADERS,
      rows:    stats
        .iter()
        .map(|row| dated_row(&row.staff, row.counts, &stamp))
        .collect(),
    };

    self.save(table, "all_staff_report.xlsx".to_owned()).await
  }

  /// A single staff record with its all-time counts.
  ///
  /// Fails with [`baho_core::Error::StaffNotFound`] for an unknown id.
  pub async fn staff_report<S: RatingStore>(
    &self,
    store: &S,
    staff_id: StaffId,
  ) -> Result<PathBuf> {
    let staff = store
      .get_staff(staff_id)
      .await
      .map_err(store_err)?
      .ok_or(baho_core::Error::StaffNotFound(staff_id))?;
    let counts = store.stats_for(staff_id).await.map_err(store_err)?;

    let table = Table {
      sheet:   "Staff Report".to_owned(),
      headers: DATED_HEADERS,
      rows:    vec![dated_row(&staff, counts, &Stamp::at(Utc::now()))],
    };

    self.save(table, format!("staff_{staff_id}_report.xlsx")).await
  }

  /// Counts within one calendar month. Only staff with votes that month
  /// appear, and votes for since-deleted staff are left out.
  pub async fn month_report<S: RatingStore>(
    &self,
    store: &S,
    bucket: Bucket,
  ) -> Result<PathBuf> {
    let stats = store.stats_for_month(bucket).await.map_err(store_err)?;
    let staff = store.list_staff().await.map_err(store_err)?;
    let (month, year) = (bucket.month(), bucket.year());

    let table = Table {
      sheet:   format!("{month}_{year}"),
      headers: MONTH_HEADERS,
      rows:    month_rows(bucket, &stats, &staff),
    };

    self.save(table, format!("month_{month}_{year}.xlsx")).await
  }

  async fn save(&self, table: Table, file_name: String) -> Result<PathBuf> {
    let dir = self.export_dir.clone();
    let path = dir.join(&file_name);
    let target = path.clone();

    tokio::task::spawn_blocking(move || -> Result<()> {
      std::fs::create_dir_all(&dir)?;
      table.write(&target)
    })
    .await??;

    tracing::info!(path = %path.display(), "wrote report");
    Ok(path)
  }
}

#[cfg(test)]
mod tests {
  use baho_core::{staff::Staff, vote::VoteKind};
  use baho_store_sqlite::SqliteStore;
  use chrono::TimeZone as _;

  use super::*;

  async fn seeded() -> SqliteStore {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.upsert_staff(Staff::new(1, "Alice", "Cashier", "Tashkent")).await.unwrap();
    store.upsert_staff(Staff::new(2, "Bob", "Manager", "Samarkand")).await.unwrap();
    store.record_vote(1, VoteKind::Like).await.unwrap();
    store
  }

  fn is_xlsx(path: &Path) -> bool {
    std::fs::read(path).map(|b| b.starts_with(b"PK")).unwrap_or(false)
  }

  #[tokio::test]
  async fn all_staff_report_writes_fixed_name() {
    let tmp = tempfile::tempdir().unwrap();
    let reports = ReportBuilder::new(tmp.path().join("exports"));
    let store = seeded().await;

    let path = reports.all_staff_report(&store).await.unwrap();
    assert_eq!(path, tmp.path().join("exports").join("all_staff_report.xlsx"));
    assert!(is_xlsx(&path));
  }

  #[tokio::test]
  async fn regenerating_overwrites_the_same_file() {
    let tmp = tempfile::tempdir().unwrap();
    let reports = ReportBuilder::new(tmp.path());
    let store = seeded().await;

    let first = reports.all_staff_report(&store).await.unwrap();
    store.upsert_staff(Staff::new(3, "Carol", "Clerk", "Navoi")).await.unwrap();
    let second = reports.all_staff_report(&store).await.unwrap();

    assert_eq!(first, second);
    let entries = std::fs::read_dir(tmp.path()).unwrap().count();
    assert_eq!(entries, 1);
  }

  #[tokio::test]
  async fn staff_report_for_known_staff() {
    let tmp = tempfile::tempdir().unwrap();
    let reports = ReportBuilder::new(tmp.path());
    let store = seeded().await;

    let path = reports.staff_report(&store, 2).await.unwrap();
    assert_eq!(path.file_name().unwrap(), "staff_2_report.xlsx");
    assert!(is_xlsx(&path));
  }

  #[tokio::test]
  async fn staff_report_for_unknown_staff_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let reports = ReportBuilder::new(tmp.path());
    let store = seeded().await;

    let err = reports.staff_report(&store, 77).await.unwrap_err();
    assert!(matches!(err, Error::Core(baho_core::Error::StaffNotFound(77))));
    assert!(!tmp.path().join("staff_77_report.xlsx").exists());
  }

  #[tokio::test]
  async fn month_report_name_and_content() {
    let tmp = tempfile::tempdir().unwrap();
    let reports = ReportBuilder::new(tmp.path());
    let store = seeded().await;
    let march = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
    store.record_vote_at(2, VoteKind::Dislike, march).await.unwrap();

    let path = reports
      .month_report(&store, Bucket::new(2024, 3).unwrap())
      .await
      .unwrap();
    assert_eq!(path.file_name().unwrap(), "month_3_2024.xlsx");
    assert!(is_xlsx(&path));
  }
}
