//! The [`Resource`] trait, the contract every CRUD collection follows.
//!
//! A resource kind is a record type plus two payload types: `New`, the full
//! set of caller-supplied fields accepted on create, and `Patch`, the same
//! fields all optional, merged onto an existing record on update.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
  kind::ResourceKind,
  validate::{self, FieldRule, Mode, ValidationErrors},
};

/// A field whose value may be supplied as an uploaded file.
///
/// The API stores the file under `category` and writes the resulting URL into
/// `field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upload {
  pub field:    &'static str,
  pub category: &'static str,
}

/// A record type stored in its own independent collection.
pub trait Resource:
  Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
  const KIND: ResourceKind;

  /// Field rules applied to create and update payloads.
  const RULES: &'static [FieldRule];

  /// Set for kinds that accept a multipart file upload.
  const UPLOAD: Option<Upload> = None;

  type New: DeserializeOwned + Send + 'static;
  type Patch: DeserializeOwned + Default + Send + 'static;

  /// Store-assigned integer id.
  fn id(&self) -> i64;

  /// Caller-supplied human-readable identifier (`facultyId`, `bannerId`, ...).
  fn business_key(&self) -> &str;

  fn created_at(&self) -> DateTime<Utc>;

  /// Build the stored record. `now` is the store clock and becomes
  /// `createdAt`.
  fn from_new(id: i64, now: DateTime<Utc>, new: Self::New) -> Self;

  /// Shallow merge: supplied fields overwrite, absent fields are retained.
  fn apply(&mut self, patch: Self::Patch);

  /// Listing order for the kind. The store sorts stably from insertion
  /// order, so `Equal` keeps records in the order they were created.
  fn listing_order(_a: &Self, _b: &Self) -> Ordering { Ordering::Equal }

  /// URL of the file currently attached through [`Resource::UPLOAD`].
  fn attachment(&self) -> Option<&str> { None }

  /// Validate and decode a create payload.
  fn parse_new(payload: Value) -> Result<Self::New, ValidationErrors> {
    validate::validate(Self::RULES, &payload, Mode::Create)?;
    validate::decode(payload)
  }

  /// Validate and decode a partial update payload.
  fn parse_patch(payload: Value) -> Result<Self::Patch, ValidationErrors> {
    validate::validate(Self::RULES, &payload, Mode::Update)?;
    validate::decode(payload)
  }
}

/// Sort records, given in insertion order, into the kind's listing order.
pub fn sort_for_listing<R: Resource>(records: &mut [R]) {
  records.sort_by(R::listing_order);
}
