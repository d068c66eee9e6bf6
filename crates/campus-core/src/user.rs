//! Login accounts.
//!
//! Users are kept by the same store as the resource collections and draw ids
//! from the same counter, but they are never exposed through the resource
//! API.

use serde::{Deserialize, Serialize};

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:            i64,
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub password_hash: String,
}

impl User {
  pub fn from_new(id: i64, new: NewUser) -> Self {
    Self {
      id,
      username: new.username,
      password_hash: new.password_hash,
    }
  }
}
