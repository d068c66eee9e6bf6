//! [`SqliteStore`]: the SQLite implementation of [`ResourceStore`].

use std::path::Path;

use campus_core::{
  Resource, ResourceKind,
  resource::sort_for_listing,
  store::ResourceStore,
  user::{NewUser, User},
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{USER_KIND, decode_body, encode_body, encode_dt, encode_kind},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A portal store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read the JSON body of one row of `kind`.
  async fn body(&self, kind: &'static str, id: i64) -> Result<Option<String>> {
    let body = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT body FROM records WHERE id = ?1 AND kind = ?2",
              rusqlite::params![id, kind],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(body)
  }
}

// ─── ResourceStore impl ──────────────────────────────────────────────────────

impl ResourceStore for SqliteStore {
  type Error = Error;

  async fn list<R: Resource>(&self) -> Result<Vec<R>> {
    let kind = encode_kind(R::KIND);

    let bodies: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare("SELECT body FROM records WHERE kind = ?1 ORDER BY id")?;
        let rows = stmt
          .query_map(rusqlite::params![kind], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;

    let mut records = bodies
      .iter()
      .map(|b| serde_json::from_str(b))
      .collect::<serde_json::Result<Vec<R>>>()?;
    sort_for_listing(&mut records);
    Ok(records)
  }

  async fn get<R: Resource>(&self, id: i64) -> Result<Option<R>> {
    let body = self.body(encode_kind(R::KIND), id).await?;
    Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
  }

  async fn create<R: Resource>(&self, new: R::New) -> Result<R> {
    let kind = encode_kind(R::KIND);
    let now = Utc::now();
    let at_str = encode_dt(now);

    let record = self
      .conn
      .call(move |conn| {
        // The id is only known after the insert, and the body embeds it.
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO records (kind, body, created_at) VALUES (?1, '{}', ?2)",
          rusqlite::params![kind, at_str],
        )?;
        let id = tx.last_insert_rowid();
        let record = R::from_new(id, now, new);
        tx.execute(
          "UPDATE records SET body = ?1 WHERE id = ?2",
          rusqlite::params![encode_body(&record)?, id],
        )?;
        tx.commit()?;
        Ok(record)
      })
      .await?;

    Ok(record)
  }

  async fn update<R: Resource>(&self, id: i64, patch: R::Patch) -> Result<R> {
    let kind = encode_kind(R::KIND);

    let updated: Option<R> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let body: Option<String> = tx
          .query_row(
            "SELECT body FROM records WHERE id = ?1 AND kind = ?2",
            rusqlite::params![id, kind],
            |row| row.get(0),
          )
          .optional()?;
        let Some(body) = body else {
          return Ok(None);
        };

        let mut record: R = decode_body(&body)?;
        record.apply(patch);
        tx.execute(
          "UPDATE records SET body = ?1 WHERE id = ?2",
          rusqlite::params![encode_body(&record)?, id],
        )?;
        tx.commit()?;
        Ok(Some(record))
      })
      .await?;

    updated.ok_or_else(|| campus_core::Error::NotFound { kind: R::KIND, id }.into())
  }

  async fn delete<R: Resource>(&self, id: i64) -> Result<()> {
    let kind = encode_kind(R::KIND);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM records WHERE id = ?1 AND kind = ?2",
          rusqlite::params![id, kind],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn count(&self, kind: ResourceKind) -> Result<usize> {
    let kind = encode_kind(kind);
    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM records WHERE kind = ?1",
          rusqlite::params![kind],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(usize::try_from(n).unwrap_or_default())
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, new: NewUser) -> Result<User> {
    let username = new.username.clone();
    let at_str = encode_dt(Utc::now());

    let created: Option<User> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = tx
          .query_row(
            "SELECT 1 FROM records WHERE kind = ?1 AND json_extract(body, '$.username') = ?2",
            rusqlite::params![USER_KIND, new.username],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO records (kind, body, created_at) VALUES (?1, '{}', ?2)",
          rusqlite::params![USER_KIND, at_str],
        )?;
        let id = tx.last_insert_rowid();
        let user = User::from_new(id, new);
        tx.execute(
          "UPDATE records SET body = ?1 WHERE id = ?2",
          rusqlite::params![encode_body(&user)?, id],
        )?;
        tx.commit()?;
        Ok(Some(user))
      })
      .await?;

    created.ok_or_else(|| campus_core::Error::DuplicateUser(username).into())
  }

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    let body = self.body(USER_KIND, id).await?;
    Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
  }

  async fn get_user_by_username<'a>(&'a self, username: &'a str) -> Result<Option<User>> {
    let username = username.to_owned();
    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT body FROM records
               WHERE kind = ?1 AND json_extract(body, '$.username') = ?2",
              rusqlite::params![USER_KIND, username],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
  }
}
