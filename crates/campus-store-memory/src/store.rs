//! [`MemoryStore`]: the in-memory implementation of [`ResourceStore`].

use std::{
  collections::{BTreeMap, HashMap},
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use campus_core::{
  Resource, ResourceKind,
  resource::sort_for_listing,
  store::ResourceStore,
  user::{NewUser, User},
};
use chrono::Utc;
use serde_json::Value;

use crate::{Error, Result};

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct State {
  /// Last id handed out, shared by every collection and by users.
  last_id:     i64,
  /// Records as JSON, keyed by id. Ids only grow, so key order is insertion
  /// order.
  collections: HashMap<ResourceKind, BTreeMap<i64, Value>>,
  users:       BTreeMap<i64, User>,
}

impl State {
  fn next_id(&mut self) -> i64 {
    self.last_id += 1;
    self.last_id
  }

  fn decode_all<R: Resource>(&self) -> Result<Vec<R>> {
    let Some(collection) = self.collections.get(&R::KIND) else {
      return Ok(Vec::new());
    };
    collection
      .values()
      .map(|v| serde_json::from_value(v.clone()).map_err(Error::from))
      .collect()
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A portal store held entirely in process memory.
///
/// Cloning is cheap and clones share state. A single mutex serialises
/// operations so each one runs to completion before the next; concurrent
/// updates to the same record are last-write-wins.
#[derive(Clone, Default)]
pub struct MemoryStore {
  state: Arc<Mutex<State>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, State> {
    // A panic mid-operation cannot leave a half-written record: every write
    // is a single map insert or remove.
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

// ─── ResourceStore impl ──────────────────────────────────────────────────────

impl ResourceStore for MemoryStore {
  type Error = Error;

  async fn list<R: Resource>(&self) -> Result<Vec<R>> {
    let mut records = self.lock().decode_all::<R>()?;
    sort_for_listing(&mut records);
    Ok(records)
  }

  async fn get<R: Resource>(&self, id: i64) -> Result<Option<R>> {
    let state = self.lock();
    state
      .collections
      .get(&R::KIND)
      .and_then(|c| c.get(&id))
      .map(|v| serde_json::from_value(v.clone()))
      .transpose()
      .map_err(Error::from)
  }

  async fn create<R: Resource>(&self, new: R::New) -> Result<R> {
    let mut state = self.lock();
    let id = state.next_id();
    let record = R::from_new(id, Utc::now(), new);
    let value = serde_json::to_value(&record)?;
    state.collections.entry(R::KIND).or_default().insert(id, value);
    Ok(record)
  }

  async fn update<R: Resource>(&self, id: i64, patch: R::Patch) -> Result<R> {
    let mut state = self.lock();
    let slot = state
      .collections
      .get_mut(&R::KIND)
      .and_then(|c| c.get_mut(&id))
      .ok_or(campus_core::Error::NotFound { kind: R::KIND, id })?;

    let mut record: R = serde_json::from_value(slot.clone())?;
    record.apply(patch);
    *slot = serde_json::to_value(&record)?;
    Ok(record)
  }

  async fn delete<R: Resource>(&self, id: i64) -> Result<()> {
    if let Some(collection) = self.lock().collections.get_mut(&R::KIND) {
      collection.remove(&id);
    }
    Ok(())
  }

  async fn count(&self, kind: ResourceKind) -> Result<usize> {
    Ok(self.lock().collections.get(&kind).map_or(0, BTreeMap::len))
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, new: NewUser) -> Result<User> {
    let mut state = self.lock();
    if state.users.values().any(|u| u.username == new.username) {
      return Err(campus_core::Error::DuplicateUser(new.username).into());
    }
    let id = state.next_id();
    let user = User::from_new(id, new);
    state.users.insert(id, user.clone());
    Ok(user)
  }

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    Ok(self.lock().users.get(&id).cloned())
  }

  async fn get_user_by_username<'a>(&'a self, username: &'a str) -> Result<Option<User>> {
    Ok(
      self
        .lock()
        .users
        .values()
        .find(|u| u.username == username)
        .cloned(),
    )
  }
}
