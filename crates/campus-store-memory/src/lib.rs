//! In-memory backend for the campus portal store.
//!
//! State lives for the lifetime of the process: initialised empty on
//! [`MemoryStore::new`], discarded when the last clone is dropped.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MemoryStore;
