use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::merge;
use crate::{
  kind::ResourceKind,
  resource::Resource,
  validate::{FieldKind, FieldRule},
};

/// A management-team member. Listed in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementMember {
  pub id:            i64,
  pub management_id: String,
  pub name:          String,
  pub branch:        String,
  pub designation:   String,
  pub mobile_no:     String,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewManagementMember {
  pub management_id: String,
  pub name:          String,
  pub branch:        String,
  pub designation:   String,
  pub mobile_no:     String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementPatch {
  pub management_id: Option<String>,
  pub name:          Option<String>,
  pub branch:        Option<String>,
  pub designation:   Option<String>,
  pub mobile_no:     Option<String>,
}

impl Resource for ManagementMember {
  type New = NewManagementMember;
  type Patch = ManagementPatch;

  const KIND: ResourceKind = ResourceKind::Management;
  const RULES: &'static [FieldRule] = &[
    FieldRule::required("managementId", FieldKind::Text),
    FieldRule::required("name", FieldKind::Text),
    FieldRule::required("branch", FieldKind::Text),
    FieldRule::required("designation", FieldKind::Text),
    FieldRule::required("mobileNo", FieldKind::Text),
  ];

  fn id(&self) -> i64 { self.id }

  fn business_key(&self) -> &str { &self.management_id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn from_new(id: i64, now: DateTime<Utc>, new: NewManagementMember) -> Self {
    Self {
      id,
      management_id: new.management_id,
      name: new.name,
      branch: new.branch,
      designation: new.designation,
      mobile_no: new.mobile_no,
      created_at: now,
    }
  }

  fn apply(&mut self, patch: ManagementPatch) {
    merge(&mut self.management_id, patch.management_id);
    merge(&mut self.name, patch.name);
    merge(&mut self.branch, patch.branch);
    merge(&mut self.designation, patch.designation);
    merge(&mut self.mobile_no, patch.mobile_no);
  }
}
