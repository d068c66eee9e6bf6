//! Error type for `campus-store-memory`.

use campus_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] campus_core::Error),

  /// A stored record no longer decodes as its kind.
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

impl StoreError for Error {
  fn is_not_found(&self) -> bool {
    matches!(self, Error::Core(campus_core::Error::NotFound { .. }))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
