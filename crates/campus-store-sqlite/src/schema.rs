//! SQL schema for the campus SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
///
/// Every kind shares one table so that ids come from a single
/// `AUTOINCREMENT` sequence and are never reused after a delete.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS records (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    kind        TEXT NOT NULL,   -- resource kind tag, or 'user'
    body        TEXT NOT NULL,   -- full record as a JSON document
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS records_kind_idx ON records(kind);

PRAGMA user_version = 1;
";
