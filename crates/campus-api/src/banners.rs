//! `PATCH /banners/{id}/priority`: reorder a banner without resending it.

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use campus_core::{
  records::{Banner, BannerPatch},
  store::ResourceStore,
  validate::{FieldKind, FieldRule, Mode, decode, validate},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::{ApiState, error::ApiError};

const PRIORITY_RULES: &[FieldRule] = &[FieldRule::required("priority", FieldKind::Integer)];

#[derive(Debug, Deserialize)]
pub struct PriorityBody {
  pub priority: i64,
}

/// `PATCH /banners/{id}/priority` with body `{"priority": 3}`
pub async fn set_priority<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Banner>, ApiError>
where
  S: ResourceStore,
{
  let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  validate(PRIORITY_RULES, &body, Mode::Create)?;
  let PriorityBody { priority } = decode(body)?;

  let banner = state
    .store
    .update::<Banner>(id, BannerPatch::priority(priority))
    .await
    .map_err(ApiError::store)?;

  info!(id, priority, "banner priority changed");
  Ok(Json(banner))
}
