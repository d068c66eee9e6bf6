use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::merge;
use crate::{
  kind::ResourceKind,
  resource::Resource,
  validate::{FieldKind, FieldRule},
};

/// An intellectual-property record (patent, design, copyright grant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ipr {
  pub id:          i64,
  pub ipr_id:      String,
  pub year:        String,
  pub grant_no:    String,
  pub affiliation: String,
  pub title:       String,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIpr {
  pub ipr_id:      String,
  pub year:        String,
  pub grant_no:    String,
  pub affiliation: String,
  pub title:       String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IprPatch {
  pub ipr_id:      Option<String>,
  pub year:        Option<String>,
  pub grant_no:    Option<String>,
  pub affiliation: Option<String>,
  pub title:       Option<String>,
}

impl Resource for Ipr {
  type New = NewIpr;
  type Patch = IprPatch;

  const KIND: ResourceKind = ResourceKind::Ipr;
  const RULES: &'static [FieldRule] = &[
    FieldRule::required("iprId", FieldKind::Text),
    FieldRule::required("year", FieldKind::Text),
    FieldRule::required("grantNo", FieldKind::Text),
    FieldRule::required("affiliation", FieldKind::Text),
    FieldRule::required("title", FieldKind::Text),
  ];

  fn id(&self) -> i64 { self.id }

  fn business_key(&self) -> &str { &self.ipr_id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn from_new(id: i64, now: DateTime<Utc>, new: NewIpr) -> Self {
    Self {
      id,
      ipr_id: new.ipr_id,
      year: new.year,
      grant_no: new.grant_no,
      affiliation: new.affiliation,
      title: new.title,
      created_at: now,
    }
  }

  fn apply(&mut self, patch: IprPatch) {
    merge(&mut self.ipr_id, patch.ipr_id);
    merge(&mut self.year, patch.year);
    merge(&mut self.grant_no, patch.grant_no);
    merge(&mut self.affiliation, patch.affiliation);
    merge(&mut self.title, patch.title);
  }

  fn listing_order(a: &Self, b: &Self) -> Ordering { b.created_at.cmp(&a.created_at) }
}
