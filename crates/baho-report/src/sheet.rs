//! Row layout and workbook writing.
//!
//! Everything here is synchronous and store-agnostic: callers hand over
//! already-fetched rows and get a file on disk.

use std::{collections::HashMap, path::Path};

use baho_core::{
  staff::Staff,
  stats::{Bucket, MonthStats, VoteCounts},
};
use chrono::{DateTime, Datelike as _, Utc};
use rust_xlsxwriter::{Format, FormatAlign, Workbook};

use crate::Result;

/// Header of the all-staff and single-staff reports.
pub const DATED_HEADERS: &[&str] = &[
  "ID", "Name", "Position", "Region", "Likes", "Dislikes", "Neutrals", "Total",
  "Date", "Month", "Year",
];

/// Header of the month report; the bucket replaces the generation date.
pub const MONTH_HEADERS: &[&str] = &[
  "ID", "Name", "Position", "Region", "Likes", "Dislikes", "Neutrals", "Total",
  "Month", "Year",
];

const COLUMN_WIDTHS: &[f64] = &[7.0, 13.0, 30.0, 13.0, 6.0, 6.0, 6.0, 6.0, 10.0, 10.0, 6.0];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
  Text(String),
  Number(f64),
}

impl From<&str> for Cell {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for Cell {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<i64> for Cell {
  fn from(n: i64) -> Self { Self::Number(n as f64) }
}

impl From<u64> for Cell {
  fn from(n: u64) -> Self { Self::Number(n as f64) }
}

impl From<i32> for Cell {
  fn from(n: i32) -> Self { Self::Number(f64::from(n)) }
}

impl From<u32> for Cell {
  fn from(n: u32) -> Self { Self::Number(f64::from(n)) }
}

pub type Row = Vec<Cell>;

// ─── Generation stamp ────────────────────────────────────────────────────────

/// The trailing date columns of dated reports, fixed at generation time.
#[derive(Debug, Clone)]
pub struct Stamp {
  pub date:  String,
  pub month: String,
  pub year:  i32,
}

impl Stamp {
  pub fn at(now: DateTime<Utc>) -> Self {
    Self {
      date:  now.format("%d.%m.%Y").to_string(),
      month: now.format("%B").to_string(),
      year:  now.year(),
    }
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

fn staff_cells(staff: &Staff, counts: VoteCounts) -> Row {
  vec![
    staff.staff_id.into(),
    staff.name.as_str().into(),
    staff.position.as_str().into(),
    staff.region.as_str().into(),
    counts.likes.into(),
    counts.dislikes.into(),
    counts.neutrals.into(),
    counts.total().into(),
  ]
}

pub fn dated_row(staff: &Staff, counts: VoteCounts, stamp: &Stamp) -> Row {
  let mut row = staff_cells(staff, counts);
  row.push(stamp.date.as_str().into());
  row.push(stamp.month.as_str().into());
  row.push(stamp.year.into());
  row
}

/// One row per bucketed staff id, in the order given. Ids with no current
/// staff record are skipped.
pub fn month_rows(bucket: Bucket, stats: &[MonthStats], staff: &[Staff]) -> Vec<Row> {
  let by_id: HashMap<_, _> = staff.iter().map(|s| (s.staff_id, s)).collect();

  stats
    .iter()
    .filter_map(|m| {
      let staff = by_id.get(&m.staff_id)?;
      let mut row = staff_cells(staff, m.counts);
      row.push(bucket.month().into());
      row.push(bucket.year().into());
      Some(row)
    })
    .collect()
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// A single-sheet workbook waiting to be written.
#[derive(Debug, Clone)]
pub struct Table {
  pub sheet:   String,
  pub headers: &'static [&'static str],
  pub rows:    Vec<Row>,
}

impl Table {
  /// Write the workbook to `path`, replacing any existing file.
  pub fn write(&self, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold().set_align(FormatAlign::Center);

    let sheet = workbook.add_worksheet();
    sheet.set_name(self.sheet.as_str())?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
      sheet.set_column_width(col as u16, *width)?;
    }

    for (col, title) in self.headers.iter().enumerate() {
      sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (i, row) in self.rows.iter().enumerate() {
      let r = i as u32 + 1;
      for (col, cell) in row.iter().enumerate() {
        match cell {
          Cell::Text(s) => sheet.write_string(r, col as u16, s.as_str())?,
          Cell::Number(n) => sheet.write_number(r, col as u16, *n)?,
        };
      }
    }

    workbook.save(path)?;
    Ok(())
  }
}
