//! `GET /stats`: record counts for the dashboard.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use campus_core::{ResourceKind, store::ResourceStore};
use strum::IntoEnumIterator as _;

use crate::{ApiState, error::ApiError};

/// `GET /stats`
///
/// Returns `{ "<kind path>": <count>, ... }` with an entry for every kind,
/// zero counts included.
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<BTreeMap<&'static str, usize>>, ApiError>
where
  S: ResourceStore,
{
  let mut counts = BTreeMap::new();
  for kind in ResourceKind::iter() {
    let n = state.store.count(kind).await.map_err(ApiError::store)?;
    counts.insert(kind.path(), n);
  }
  Ok(Json(counts))
}
