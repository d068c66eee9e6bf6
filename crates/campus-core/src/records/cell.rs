use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{merge, nullable};
use crate::{
  kind::ResourceKind,
  resource::Resource,
  validate::{FieldKind, FieldRule},
};

/// A cell or committee, optionally linked to a PDF (minutes, charter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
  pub id:         i64,
  pub cell_id:    String,
  pub name:       String,
  pub pdf_url:    Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCell {
  pub cell_id: String,
  pub name:    String,
  #[serde(default)]
  pub pdf_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellPatch {
  pub cell_id: Option<String>,
  pub name:    Option<String>,
  #[serde(default, deserialize_with = "nullable")]
  pub pdf_url: Option<Option<String>>,
}

impl Resource for Cell {
  type New = NewCell;
  type Patch = CellPatch;

  const KIND: ResourceKind = ResourceKind::Cell;
  const RULES: &'static [FieldRule] = &[
    FieldRule::required("cellId", FieldKind::Text),
    FieldRule::required("name", FieldKind::Text),
    FieldRule::optional("pdfUrl", FieldKind::Text).nullable(),
  ];

  fn id(&self) -> i64 { self.id }

  fn business_key(&self) -> &str { &self.cell_id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn from_new(id: i64, now: DateTime<Utc>, new: NewCell) -> Self {
    Self {
      id,
      cell_id: new.cell_id,
      name: new.name,
      pdf_url: new.pdf_url,
      created_at: now,
    }
  }

  fn apply(&mut self, patch: CellPatch) {
    merge(&mut self.cell_id, patch.cell_id);
    merge(&mut self.name, patch.name);
    merge(&mut self.pdf_url, patch.pdf_url);
  }
}
