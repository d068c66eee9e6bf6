//! HTTP server for the campus admin portal.
//!
//! Mounts the resource API under `/api`, adds login and the optional
//! Basic-auth guard, and serves uploaded files from `/uploads`.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router, middleware,
  routing::post,
};
use campus_api::{FileStore, files::UPLOADS_PREFIX};
use campus_core::store::ResourceStore;
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which [`ResourceStore`] implementation backs the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  /// Process-lifetime maps; everything is lost on restart.
  #[default]
  Memory,
  /// A single SQLite file at `store_path`.
  Sqlite,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `CAMPUS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  /// Public origin used to build upload URLs.
  #[serde(default = "default_base_url")]
  pub base_url:            String,
  #[serde(default = "default_upload_dir")]
  pub upload_dir:          PathBuf,
  #[serde(default)]
  pub backend:             Backend,
  #[serde(default = "default_store_path")]
  pub store_path:          PathBuf,
  #[serde(default = "default_admin_username")]
  pub admin_username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub admin_password_hash: String,
  /// Require Basic credentials on every non-GET resource request.
  #[serde(default)]
  pub require_auth:        bool,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 5000 }
fn default_base_url() -> String { "http://localhost:5000".to_owned() }
fn default_upload_dir() -> PathBuf { PathBuf::from("uploads") }
fn default_store_path() -> PathBuf { PathBuf::from("campus.db") }
fn default_admin_username() -> String { "admin".to_owned() }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the server's own handlers.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub files:  Arc<FileStore>,
  pub config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      files:  Arc::clone(&self.files),
      config: Arc::clone(&self.config),
    }
  }
}

impl<S: ResourceStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    let files = FileStore::new(&config.upload_dir, &config.base_url);
    Self {
      store:  Arc::new(store),
      files:  Arc::new(files),
      config: Arc::new(config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ResourceStore + 'static,
{
  let mut resources = campus_api::api_router(state.store.clone(), state.files.clone());
  if state.config.require_auth {
    resources = resources.layer(middleware::from_fn_with_state(
      state.clone(),
      auth::require_auth::<S>,
    ));
  }

  let login = Router::new()
    .route("/login", post(auth::login::<S>))
    .with_state(state.clone());

  Router::new()
    .nest("/api", resources.merge(login))
    .nest_service(UPLOADS_PREFIX, ServeDir::new(state.files.root()))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
  use campus_store_memory::MemoryStore;
  use campus_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  fn config(upload_dir: &std::path::Path, hash: String, require_auth: bool) -> ServerConfig {
    ServerConfig {
      host: default_host(),
      port: default_port(),
      base_url: default_base_url(),
      upload_dir: upload_dir.to_path_buf(),
      backend: Backend::Memory,
      store_path: PathBuf::from(":memory:"),
      admin_username: "admin".to_string(),
      admin_password_hash: hash,
      require_auth,
    }
  }

  async fn make_state<S: ResourceStore>(
    store: S,
    dir: &tempfile::TempDir,
    require_auth: bool,
  ) -> AppState<S> {
    let hash = auth::hash_password("secret").unwrap();
    let state = AppState::new(store, config(dir.path(), hash.clone(), require_auth));
    auth::ensure_admin(&*state.store, "admin", &hash).await.unwrap();
    state
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  fn json_request(method: &str, uri: &str, body: Value, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
  }

  fn ipr() -> Value {
    json!({
      "iprId": "IPR1", "year": "2023", "grantNo": "G-77",
      "affiliation": "ECE", "title": "Low-power sensor",
    })
  }

  #[tokio::test]
  async fn login_accepts_the_admin_password() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(MemoryStore::new(), &dir, false).await;

    let resp = router(state.clone())
      .oneshot(json_request(
        "POST",
        "/api/login",
        json!({ "username": "admin", "password": "secret" }),
        None,
      ))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["username"], json!("admin"));
    assert!(body.get("passwordHash").is_none());

    let resp = router(state)
      .oneshot(json_request(
        "POST",
        "/api/login",
        json!({ "username": "admin", "password": "admin123" }),
        None,
      ))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn malformed_login_gets_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(MemoryStore::new(), &dir, false).await;

    let resp = router(state.clone())
      .oneshot(json_request("POST", "/api/login", json!({ "username": "admin" }), None))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());

    let resp = router(state)
      .oneshot(
        Request::post("/api/login")
          .body(Body::from("username=admin&password=secret"))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn open_api_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(MemoryStore::new(), &dir, false).await;
    let resp = router(state)
      .oneshot(json_request("POST", "/api/ipr", ipr(), None))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  #[tokio::test]
  async fn guard_blocks_writes_without_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(MemoryStore::new(), &dir, true).await;

    let resp = router(state.clone())
      .oneshot(json_request("POST", "/api/ipr", ipr(), None))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let wrong = auth_header("admin", "nope");
    let resp = router(state.clone())
      .oneshot(json_request("POST", "/api/ipr", ipr(), Some(&wrong)))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let good = auth_header("admin", "secret");
    let resp = router(state.clone())
      .oneshot(json_request("POST", "/api/ipr", ipr(), Some(&good)))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Reads and login stay open.
    let resp = router(state.clone())
      .oneshot(Request::get("/api/ipr").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router(state)
      .oneshot(json_request(
        "POST",
        "/api/login",
        json!({ "username": "admin", "password": "secret" }),
        None,
      ))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn uploaded_files_are_served() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(MemoryStore::new(), &dir, false).await;

    let url = state.files.save("faculty", "a.txt", b"hello").await.unwrap();
    let path = url.strip_prefix(&state.config.base_url).unwrap().to_owned();

    let resp = router(state)
      .oneshot(Request::get(path.as_str()).body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"hello");
  }

  #[tokio::test]
  async fn sqlite_backend_serves_the_same_api() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("campus.db")).await.unwrap();
    let state = make_state(store, &dir, false).await;

    let resp = router(state.clone())
      .oneshot(json_request("POST", "/api/ipr", ipr(), None))
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = router(state)
      .oneshot(Request::get("/api/stats").body(Body::empty()).unwrap())
      .await
      .unwrap();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let stats: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(stats["ipr"], json!(1));
  }
}
