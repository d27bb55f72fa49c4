//! Error types for `baho-core`.

use thiserror::Error;

use crate::staff::StaffId;

#[derive(Debug, Error)]
pub enum Error {
  /// A vote kind outside `like | neutral | dislike`.
  #[error("invalid vote kind: {0:?}")]
  InvalidVoteKind(String),

  #[error("invalid month bucket: {year}-{month}")]
  InvalidBucket { year: i32, month: u32 },

  #[error("staff not found: {0}")]
  StaffNotFound(StaffId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
