//! Generic CRUD handlers, instantiated once per resource kind.
//!
//! | Method   | Path           | Notes |
//! |----------|----------------|-------|
//! | `GET`    | `/{kind}`      | All records in the kind's listing order |
//! | `GET`    | `/{kind}/{id}` | Single record, 404 if absent |
//! | `POST`   | `/{kind}`      | JSON or multipart; returns 201 + stored record |
//! | `PUT`    | `/{kind}/{id}` | Partial update; returns the merged record |
//! | `DELETE` | `/{kind}/{id}` | 204 whether or not the record existed |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use campus_core::{
  Resource,
  store::ResourceStore,
  validate::{Mode, validate},
};
use serde_json::Value;
use tracing::info;

use crate::{
  ApiState,
  error::ApiError,
  files::FileStore,
  payload::{Payload, UploadedFile},
};

fn not_found<R: Resource>(id: i64) -> ApiError {
  ApiError::NotFound(format!("{} {id} not found", R::KIND))
}

/// Save `file` through the File Helper and write its URL into the kind's
/// upload field. Returns the URL.
async fn attach<R: Resource>(
  files: &FileStore,
  fields: &mut Value,
  file: UploadedFile,
) -> Result<Option<String>, ApiError> {
  let Some(upload) = R::UPLOAD else {
    return Ok(None);
  };

  let url = files
    .save(upload.category, &file.file_name, &file.bytes)
    .await
    .map_err(ApiError::Upload)?;
  if let Value::Object(map) = fields {
    map.insert(upload.field.to_owned(), Value::String(url.clone()));
  }
  Ok(Some(url))
}

/// Remove a file saved earlier in a request that then failed.
async fn discard(files: &FileStore, uploaded: Option<String>) {
  if let Some(url) = uploaded {
    files.delete(&url).await;
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /{kind}`
pub async fn list<S, R>(State(state): State<ApiState<S>>) -> Result<Json<Vec<R>>, ApiError>
where
  S: ResourceStore,
  R: Resource,
{
  let records = state.store.list::<R>().await.map_err(ApiError::store)?;
  Ok(Json(records))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /{kind}/{id}`
pub async fn get_one<S, R>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<R>, ApiError>
where
  S: ResourceStore,
  R: Resource,
{
  state
    .store
    .get::<R>(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found::<R>(id))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /{kind}`
pub async fn create<S, R>(
  State(state): State<ApiState<S>>,
  payload: Payload,
) -> Result<impl IntoResponse, ApiError>
where
  S: ResourceStore,
  R: Resource,
{
  let (mut fields, file) = payload.into_parts::<R>()?;

  // Text fields are checked before anything touches the disk.
  validate(R::RULES, &fields, Mode::Create)?;

  let uploaded = match file {
    Some(file) => attach::<R>(&state.files, &mut fields, file).await?,
    None => None,
  };

  let new = match R::parse_new(fields) {
    Ok(new) => new,
    Err(e) => {
      discard(&state.files, uploaded).await;
      return Err(e.into());
    }
  };

  let record = match state.store.create::<R>(new).await {
    Ok(record) => record,
    Err(e) => {
      discard(&state.files, uploaded).await;
      return Err(ApiError::store(e));
    }
  };

  info!(kind = %R::KIND, id = record.id(), key = record.business_key(), "record created");
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /{kind}/{id}`
///
/// When the kind takes uploads and the attachment changes, the previous
/// file is deleted best-effort.
pub async fn update<S, R>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  payload: Payload,
) -> Result<Json<R>, ApiError>
where
  S: ResourceStore,
  R: Resource,
{
  let (mut fields, file) = payload.into_parts::<R>()?;
  validate(R::RULES, &fields, Mode::Update)?;

  let previous = match R::UPLOAD {
    Some(_) => Some(
      state
        .store
        .get::<R>(id)
        .await
        .map_err(ApiError::store)?
        .ok_or_else(|| not_found::<R>(id))?,
    ),
    None => None,
  };

  let uploaded = match file {
    Some(file) => attach::<R>(&state.files, &mut fields, file).await?,
    None => None,
  };

  let patch = match R::parse_patch(fields) {
    Ok(patch) => patch,
    Err(e) => {
      discard(&state.files, uploaded).await;
      return Err(e.into());
    }
  };

  let updated = match state.store.update::<R>(id, patch).await {
    Ok(record) => record,
    Err(e) => {
      discard(&state.files, uploaded).await;
      return Err(ApiError::store(e));
    }
  };

  if let Some(old) = previous.as_ref().and_then(R::attachment)
    && updated.attachment() != Some(old)
  {
    state.files.delete(old).await;
  }

  info!(kind = %R::KIND, id, "record updated");
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /{kind}/{id}`
pub async fn delete<S, R>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: ResourceStore,
  R: Resource,
{
  let attachment = match R::UPLOAD {
    Some(_) => state
      .store
      .get::<R>(id)
      .await
      .map_err(ApiError::store)?
      .and_then(|r| r.attachment().map(str::to_owned)),
    None => None,
  };

  state.store.delete::<R>(id).await.map_err(ApiError::store)?;

  if let Some(url) = attachment {
    state.files.delete(&url).await;
  }

  info!(kind = %R::KIND, id, "record deleted");
  Ok(StatusCode::NO_CONTENT)
}
