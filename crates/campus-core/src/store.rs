//! The `ResourceStore` trait.
//!
//! The trait is implemented by storage backends (`campus-store-memory`,
//! `campus-store-sqlite`). Higher layers (`campus-api`, `campus-server`)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  kind::ResourceKind,
  resource::Resource,
  user::{NewUser, User},
};

/// Implemented by backend error types so callers can tell a missing record
/// apart from a storage failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_not_found(&self) -> bool;
}

/// Abstraction over a portal store backend.
///
/// One store holds every resource kind, each as an independent collection
/// keyed by integer id. Ids come from a single counter shared by all kinds
/// (users included), increase monotonically and are never reused.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ResourceStore: Send + Sync {
  type Error: StoreError;

  // ── Resources ─────────────────────────────────────────────────────────

  /// All records of kind `R`, in the kind's listing order.
  fn list<R: Resource>(
    &self,
  ) -> impl Future<Output = Result<Vec<R>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get<R: Resource>(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<R>, Self::Error>> + Send + '_;

  /// Assign the next id, stamp `createdAt` with the store clock, persist and
  /// return the full record.
  fn create<R: Resource>(
    &self,
    new: R::New,
  ) -> impl Future<Output = Result<R, Self::Error>> + Send + '_;

  /// Merge `patch` onto the record with `id` and return the result. Fails
  /// with a not-found error if the id is absent. No validation happens here.
  fn update<R: Resource>(
    &self,
    id: i64,
    patch: R::Patch,
  ) -> impl Future<Output = Result<R, Self::Error>> + Send + '_;

  /// Remove the record with `id`. An absent id is a silent no-op.
  fn delete<R: Resource>(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Number of records of `kind`.
  fn count(
    &self,
    kind: ResourceKind,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails if the username is taken.
  fn create_user(
    &self,
    new: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;
}
