//! Login, the admin seed user, and the optional HTTP Basic-auth guard.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
  Json,
  extract::{Request, State, rejection::JsonRejection},
  http::{HeaderMap, Method, header},
  middleware::Next,
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use campus_core::{
  store::ResourceStore,
  user::{NewUser, User},
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{AppState, error::Error};

/// Hash `password` into an argon2 PHC string, e.g. `$argon2id$v=19$…`
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::InvalidHash(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<(), Error> {
  let parsed_hash = PasswordHash::new(hash).map_err(|_| Error::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)
}

/// Extract `(username, password)` from an `Authorization: Basic` header.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), Error> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;
  Ok((username.to_owned(), password.to_owned()))
}

/// Look up `username` and check `password` against its stored hash.
pub async fn verify_credentials<S: ResourceStore>(
  store: &S,
  username: &str,
  password: &str,
) -> Result<User, Error> {
  let user = store
    .get_user_by_username(username)
    .await
    .map_err(Error::store)?
    .ok_or(Error::Unauthorized)?;
  verify_password(password, &user.password_hash)?;
  Ok(user)
}

/// Make sure the configured admin account exists.
///
/// An existing account is kept as stored; the configured hash only seeds a
/// fresh store.
pub async fn ensure_admin<S: ResourceStore>(
  store: &S,
  username: &str,
  password_hash: &str,
) -> Result<User, Error> {
  PasswordHash::new(password_hash).map_err(|e| Error::InvalidHash(e.to_string()))?;

  if let Some(user) = store
    .get_user_by_username(username)
    .await
    .map_err(Error::store)?
  {
    if user.password_hash != password_hash {
      warn!(username, "stored admin password differs from configuration, keeping stored");
    }
    return Ok(user);
  }

  let user = store
    .create_user(NewUser {
      username:      username.to_owned(),
      password_hash: password_hash.to_owned(),
    })
    .await
    .map_err(Error::store)?;
  info!(username, id = user.id, "admin user created");
  Ok(user)
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub id:       i64,
  pub username: String,
}

/// `POST /login` with `{"username": "...", "password": "..."}`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<LoginResponse>, Error>
where
  S: ResourceStore,
{
  let Json(body) = body.map_err(|e| Error::BadRequest(e.body_text()))?;
  let user = match verify_credentials(&*state.store, &body.username, &body.password).await {
    Ok(user) => user,
    Err(e) => {
      warn!(username = %body.username, "login rejected");
      return Err(e);
    }
  };
  info!(username = %user.username, "login succeeded");
  Ok(Json(LoginResponse {
    id:       user.id,
    username: user.username,
  }))
}

/// Middleware: reads pass through, anything else needs Basic credentials of
/// a stored user.
pub async fn require_auth<S>(
  State(state): State<AppState<S>>,
  req: Request,
  next: Next,
) -> Result<Response, Error>
where
  S: ResourceStore,
{
  if req.method() == Method::GET || req.method() == Method::HEAD {
    return Ok(next.run(req).await);
  }

  let (username, password) = basic_credentials(req.headers())?;
  verify_credentials(&*state.store, &username, &password).await?;
  Ok(next.run(req).await)
}
