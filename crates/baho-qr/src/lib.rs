//! Deep-link QR codes for staff members.
//!
//! Each staff member gets a PNG encoding `https://t.me/<bot>?start=staff_<id>`.
//! Images are cached by file name and never invalidated: if the bot handle
//! changes, delete the directory to regenerate.

use std::path::{Path, PathBuf};

use baho_core::staff::StaffId;
use image::Luma;
use qrcode::QrCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("qr encoding error: {0}")]
  Encode(#[from] qrcode::types::QrError),

  #[error("image error: {0}")]
  Image(#[from] image::ImageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Smallest edge of a rendered code, in pixels.
const MIN_DIMENSION: u32 = 300;

/// The deep link a staff QR code encodes.
pub fn deep_link(bot_handle: &str, staff_id: StaffId) -> String {
  format!("https://t.me/{bot_handle}?start=staff_{staff_id}")
}

/// File name of the cached image for `staff_id`.
pub fn file_name(staff_id: StaffId) -> String { format!("staff_{staff_id}.png") }

/// A staff QR code on disk together with the link it encodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffQr {
  pub path:      PathBuf,
  pub deep_link: String,
}

/// Writes QR images into a single cache directory.
#[derive(Debug, Clone)]
pub struct QrGenerator {
  dir: PathBuf,
}

impl QrGenerator {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  pub fn dir(&self) -> &Path { &self.dir }

  /// Return the cached image for `staff_id`, rendering it first if the file
  /// does not exist yet.
  pub fn get_or_create(&self, staff_id: StaffId, bot_handle: &str) -> Result<StaffQr> {
    let link = deep_link(bot_handle, staff_id);
    let path = self.dir.join(file_name(staff_id));

    if !path.exists() {
      std::fs::create_dir_all(&self.dir)?;
      let image = QrCode::new(link.as_bytes())?
        .render::<Luma<u8>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();
      image.save(&path)?;
      tracing::info!(staff_id, path = %path.display(), "generated QR code");
    }

    Ok(StaffQr { path, deep_link: link })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deep_link_format() {
    assert_eq!(
      deep_link("SenBaholash_bot", 11),
      "https://t.me/SenBaholash_bot?start=staff_11"
    );
  }

  #[test]
  fn creates_png_in_missing_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let qr = QrGenerator::new(tmp.path().join("qr"));

    let out = qr.get_or_create(3, "bot").unwrap();
    assert_eq!(out.path, tmp.path().join("qr").join("staff_3.png"));
    assert_eq!(out.deep_link, "https://t.me/bot?start=staff_3");

    let bytes = std::fs::read(&out.path).unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
  }

  #[test]
  fn second_call_reuses_file_without_rewriting() {
    let tmp = tempfile::tempdir().unwrap();
    let qr = QrGenerator::new(tmp.path());

    let first = qr.get_or_create(5, "bot").unwrap();
    let before = std::fs::metadata(&first.path).unwrap().modified().unwrap();
    let bytes_before = std::fs::read(&first.path).unwrap();

    std::thread::sleep(std::time::Duration::from_millis(20));

    let second = qr.get_or_create(5, "bot").unwrap();
    let after = std::fs::metadata(&second.path).unwrap().modified().unwrap();

    assert_eq!(first.path, second.path);
    assert_eq!(before, after);
    assert_eq!(bytes_before, std::fs::read(&second.path).unwrap());
  }

  #[test]
  fn stale_image_survives_handle_change() {
    let tmp = tempfile::tempdir().unwrap();
    let qr = QrGenerator::new(tmp.path());

    let old = qr.get_or_create(8, "old_bot").unwrap();
    let bytes = std::fs::read(&old.path).unwrap();

    let new = qr.get_or_create(8, "new_bot").unwrap();
    assert_eq!(new.deep_link, "https://t.me/new_bot?start=staff_8");
    assert_eq!(std::fs::read(&new.path).unwrap(), bytes);
  }
}
