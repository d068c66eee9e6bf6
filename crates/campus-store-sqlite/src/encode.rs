//! Encoding helpers between domain types and the plain-text columns stored in
//! SQLite.
//!
//! Timestamps are stored as RFC 3339 strings; record bodies as compact JSON.

use campus_core::ResourceKind;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

/// `kind` column value for user rows.
pub const USER_KIND: &str = "user";

pub fn encode_kind(kind: ResourceKind) -> &'static str {
  kind.into()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

/// Serialise a body inside a connection closure.
pub fn encode_body<T: Serialize>(value: &T) -> tokio_rusqlite::Result<String> {
  serde_json::to_string(value).map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
}

/// Deserialise a body inside a connection closure.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> tokio_rusqlite::Result<T> {
  serde_json::from_str(body).map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
}
