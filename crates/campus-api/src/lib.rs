//! JSON REST API for the campus portal.
//!
//! Exposes an axum [`Router`] backed by any
//! [`campus_core::store::ResourceStore`]. Auth, static file serving, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", campus_api::api_router(store.clone(), files.clone()))
//! ```

pub mod banners;
pub mod error;
pub mod files;
pub mod payload;
pub mod resources;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, patch},
};
use campus_core::{
  Resource,
  records::{Banner, Cell, Faculty, GalleryItem, Ipr, ManagementMember, News},
  store::ResourceStore,
};

pub use error::ApiError;
pub use files::FileStore;

/// Upper bound on request bodies, uploads included.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared state for every API handler.
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub files: Arc<FileStore>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      files: Arc::clone(&self.files),
    }
  }
}

/// The five CRUD routes of one resource kind.
fn resource_routes<S, R>() -> Router<ApiState<S>>
where
  S: ResourceStore + 'static,
  R: Resource,
{
  let collection = format!("/{}", R::KIND.path());
  let item = format!("/{}/{{id}}", R::KIND.path());

  Router::new()
    .route(
      &collection,
      get(resources::list::<S, R>).post(resources::create::<S, R>),
    )
    .route(
      &item,
      get(resources::get_one::<S, R>)
        .put(resources::update::<S, R>)
        .delete(resources::delete::<S, R>),
    )
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, files: Arc<FileStore>) -> Router<()>
where
  S: ResourceStore + 'static,
{
  Router::new()
    .merge(resource_routes::<S, Faculty>())
    .merge(resource_routes::<S, Banner>())
    .merge(resource_routes::<S, News>())
    .merge(resource_routes::<S, Ipr>())
    .merge(resource_routes::<S, ManagementMember>())
    .merge(resource_routes::<S, Cell>())
    .merge(resource_routes::<S, GalleryItem>())
    .route("/banners/{id}/priority", patch(banners::set_priority::<S>))
    .route("/stats", get(stats::handler::<S>))
    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
    .with_state(ApiState { store, files })
}
