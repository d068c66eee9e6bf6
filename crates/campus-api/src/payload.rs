//! [`Payload`]: a request body given either as JSON or as
//! `multipart/form-data`.

use axum::{
  Json,
  extract::{FromRequest, Multipart, Request},
  http::header::CONTENT_TYPE,
};
use bytes::Bytes;
use campus_core::{Resource, validate::coerce_form_values};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A file part of a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
  pub field:     String,
  pub file_name: String,
  pub bytes:     Bytes,
}

#[derive(Debug)]
pub struct Payload {
  /// The JSON body, or the text parts of a multipart body as strings.
  pub fields:    Value,
  pub file:      Option<UploadedFile>,
  pub multipart: bool,
}

impl Payload {
  /// Prepare the payload for resource `R`: coerce form text to the types
  /// the field rules expect and reject files the kind cannot take.
  pub fn into_parts<R: Resource>(self) -> Result<(Value, Option<UploadedFile>), ApiError> {
    let Self {
      mut fields,
      file,
      multipart,
    } = self;

    if multipart && let Value::Object(map) = &mut fields {
      coerce_form_values(R::RULES, map);
    }

    if let Some(file) = &file {
      match R::UPLOAD {
        Some(upload) if upload.field == file.field => {}
        Some(upload) => {
          return Err(ApiError::BadRequest(format!(
            "unexpected file field {:?}, expected {:?}",
            file.field, upload.field
          )));
        }
        None => {
          return Err(ApiError::BadRequest(format!(
            "{} does not accept file uploads",
            R::KIND
          )));
        }
      }
    }

    Ok((fields, file))
  }
}

fn is_multipart(req: &Request) -> bool {
  req
    .headers()
    .get(CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

impl<S> FromRequest<S> for Payload
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    if !is_multipart(&req) {
      let Json(fields) = Json::<Value>::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      return Ok(Self {
        fields,
        file: None,
        multipart: false,
      });
    }

    let mut multipart = Multipart::from_request(req, state)
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut fields = Map::new();
    let mut file = None;
    while let Some(field) = multipart
      .next_field()
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
      let Some(name) = field.name().map(str::to_owned) else {
        continue;
      };

      match field.file_name().map(str::to_owned) {
        Some(file_name) => {
          let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
          // An untouched file input still posts an empty part.
          if bytes.is_empty() {
            continue;
          }
          if file.is_some() {
            return Err(ApiError::BadRequest("only one file per request".into()));
          }
          file = Some(UploadedFile {
            field: name,
            file_name,
            bytes,
          });
        }
        None => {
          let text = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
          fields.insert(name, Value::String(text));
        }
      }
    }

    Ok(Self {
      fields: Value::Object(fields),
      file,
      multipart: true,
    })
  }
}
