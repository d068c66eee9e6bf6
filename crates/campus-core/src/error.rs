//! Error types for `campus-core`.

use thiserror::Error;

use crate::kind::ResourceKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{kind} {id} not found")]
  NotFound { kind: ResourceKind, id: i64 },

  #[error("username {0:?} is already taken")]
  DuplicateUser(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
