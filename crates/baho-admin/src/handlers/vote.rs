//! The public vote API called by the bot, and a health check.

use axum::{
  Json,
  extract::{Path, State},
};
use baho_core::{
  staff::StaffId,
  store::RatingStore,
  vote::VoteKind,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::Error};

/// Body of every vote API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
  pub ok: bool,
}

/// Record one vote. An unknown kind is answered with `ok: false` and records
/// nothing.
pub async fn record<S>(
  State(state): State<AppState<S>>,
  Path((staff_id, raw_kind)): Path<(StaffId, String)>,
) -> Result<Json<Ack>, Error>
where
  S: RatingStore + Clone + 'static,
{
  let Ok(kind) = VoteKind::parse(&raw_kind) else {
    tracing::warn!(staff_id, kind = %raw_kind, "vote rejected");
    return Ok(Json(Ack { ok: false }));
  };

  let vote = state.store.record_vote(staff_id, kind).await.map_err(Error::store)?;
  tracing::info!(staff_id, %kind, vote_id = vote.vote_id, "vote recorded");
  Ok(Json(Ack { ok: true }))
}

pub async fn health() -> Json<Ack> { Json(Ack { ok: true }) }
