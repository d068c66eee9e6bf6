use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{merge, nullable};
use crate::{
  kind::ResourceKind,
  resource::{Resource, Upload},
  validate::{FieldKind, FieldRule},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
  Other,
}

/// A faculty member. `image` holds the URL of an uploaded portrait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
  pub id:          i64,
  pub faculty_id:  String,
  pub name:        String,
  pub department:  String,
  pub designation: String,
  pub gender:      Gender,
  pub image:       Option<String>,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFaculty {
  pub faculty_id:  String,
  pub name:        String,
  pub department:  String,
  pub designation: String,
  pub gender:      Gender,
  #[serde(default)]
  pub image:       Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyPatch {
  pub faculty_id:  Option<String>,
  pub name:        Option<String>,
  pub department:  Option<String>,
  pub designation: Option<String>,
  pub gender:      Option<Gender>,
  #[serde(default, deserialize_with = "nullable")]
  pub image:       Option<Option<String>>,
}

impl Resource for Faculty {
  type New = NewFaculty;
  type Patch = FacultyPatch;

  const KIND: ResourceKind = ResourceKind::Faculty;
  const RULES: &'static [FieldRule] = &[
    FieldRule::required("facultyId", FieldKind::Text),
    FieldRule::required("name", FieldKind::Text),
    FieldRule::required("department", FieldKind::Text),
    FieldRule::required("designation", FieldKind::Text),
    FieldRule::required("gender", FieldKind::OneOf(&["male", "female", "other"])),
    FieldRule::optional("image", FieldKind::Text).nullable(),
  ];
  const UPLOAD: Option<Upload> = Some(Upload {
    field:    "image",
    category: "faculty",
  });

  fn id(&self) -> i64 { self.id }

  fn business_key(&self) -> &str { &self.faculty_id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn from_new(id: i64, now: DateTime<Utc>, new: NewFaculty) -> Self {
    Self {
      id,
      faculty_id: new.faculty_id,
      name: new.name,
      department: new.department,
      designation: new.designation,
      gender: new.gender,
      image: new.image,
      created_at: now,
    }
  }

  fn apply(&mut self, patch: FacultyPatch) {
    merge(&mut self.faculty_id, patch.faculty_id);
    merge(&mut self.name, patch.name);
    merge(&mut self.department, patch.department);
    merge(&mut self.designation, patch.designation);
    merge(&mut self.gender, patch.gender);
    merge(&mut self.image, patch.image);
  }

  fn attachment(&self) -> Option<&str> { self.image.as_deref() }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn faculty() -> Faculty {
    let new = Faculty::parse_new(json!({
      "facultyId": "FAC001",
      "name": "Ada Lovelace",
      "department": "Computer Science",
      "designation": "Professor",
      "gender": "female",
      "image": "http://localhost/uploads/faculty/1-ada.png",
    }))
    .unwrap();
    Faculty::from_new(7, Utc::now(), new)
  }

  #[test]
  fn absent_image_is_retained() {
    let mut f = faculty();
    f.apply(Faculty::parse_patch(json!({ "name": "A. Lovelace" })).unwrap());
    assert_eq!(f.name, "A. Lovelace");
    assert_eq!(f.attachment(), Some("http://localhost/uploads/faculty/1-ada.png"));
  }

  #[test]
  fn null_image_clears_it() {
    let mut f = faculty();
    f.apply(Faculty::parse_patch(json!({ "image": null })).unwrap());
    assert_eq!(f.image, None);
  }

  #[test]
  fn gender_outside_enum_is_rejected() {
    let err = Faculty::parse_patch(json!({ "gender": "robot" })).unwrap_err();
    assert!(err.contains("gender"));
  }

  #[test]
  fn client_supplied_id_and_timestamp_are_ignored() {
    let before = Utc::now();
    let new = Faculty::parse_new(json!({
      "id": 999,
      "createdAt": "2000-01-01T00:00:00Z",
      "facultyId": "FAC002",
      "name": "Alan Turing",
      "department": "Mathematics",
      "designation": "Reader",
      "gender": "male",
    }))
    .unwrap();
    let f = Faculty::from_new(3, Utc::now(), new);
    assert_eq!(f.id, 3);
    assert!(f.created_at >= before);
  }
}
