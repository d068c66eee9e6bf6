use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::merge;
use crate::{
  kind::ResourceKind,
  resource::Resource,
  validate::{FieldKind, FieldRule},
};

/// A homepage banner. Listed in ascending `priority`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
  pub id:         i64,
  pub banner_id:  String,
  pub title:      String,
  pub image_url:  String,
  pub priority:   i64,
  pub is_active:  bool,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBanner {
  pub banner_id: String,
  pub title:     String,
  pub image_url: String,
  pub priority:  i64,
  /// Defaults to `true`.
  pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerPatch {
  pub banner_id: Option<String>,
  pub title:     Option<String>,
  pub image_url: Option<String>,
  pub priority:  Option<i64>,
  pub is_active: Option<bool>,
}

impl BannerPatch {
  /// A patch that only moves the banner.
  pub fn priority(priority: i64) -> Self {
    Self {
      priority: Some(priority),
      ..Self::default()
    }
  }
}

impl Resource for Banner {
  type New = NewBanner;
  type Patch = BannerPatch;

  const KIND: ResourceKind = ResourceKind::Banner;
  const RULES: &'static [FieldRule] = &[
    FieldRule::required("bannerId", FieldKind::Text),
    FieldRule::required("title", FieldKind::Text),
    FieldRule::required("imageUrl", FieldKind::Text),
    FieldRule::required("priority", FieldKind::Integer),
    FieldRule::optional("isActive", FieldKind::Boolean),
  ];

  fn id(&self) -> i64 { self.id }

  fn business_key(&self) -> &str { &self.banner_id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn from_new(id: i64, now: DateTime<Utc>, new: NewBanner) -> Self {
    Self {
      id,
      banner_id: new.banner_id,
      title: new.title,
      image_url: new.image_url,
      priority: new.priority,
      is_active: new.is_active.unwrap_or(true),
      created_at: now,
    }
  }

  fn apply(&mut self, patch: BannerPatch) {
    merge(&mut self.banner_id, patch.banner_id);
    merge(&mut self.title, patch.title);
    merge(&mut self.image_url, patch.image_url);
    merge(&mut self.priority, patch.priority);
    merge(&mut self.is_active, patch.is_active);
  }

  fn listing_order(a: &Self, b: &Self) -> Ordering { a.priority.cmp(&b.priority) }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::resource::sort_for_listing;

  fn banner(id: i64, priority: i64) -> Banner {
    let new = Banner::parse_new(json!({
      "bannerId": format!("BAN{id:03}"),
      "title": "Welcome",
      "imageUrl": "http://x/img.png",
      "priority": priority,
    }))
    .unwrap();
    Banner::from_new(id, Utc::now(), new)
  }

  #[test]
  fn active_by_default() {
    assert!(banner(1, 1).is_active);
  }

  #[test]
  fn sorted_by_priority_with_stable_ties() {
    let mut banners = vec![banner(1, 3), banner(2, 1), banner(3, 3), banner(4, 2)];
    sort_for_listing(&mut banners);
    let ids: Vec<_> = banners.iter().map(|b| b.id).collect();
    assert_eq!(ids, [2, 4, 1, 3]);
  }

  #[test]
  fn priority_patch_touches_nothing_else() {
    let mut b = banner(1, 5);
    let before = b.clone();
    b.apply(BannerPatch::priority(0));
    assert_eq!(b.priority, 0);
    assert_eq!(b.title, before.title);
    assert_eq!(b.created_at, before.created_at);
  }

  #[test]
  fn string_priority_is_rejected() {
    let err = Banner::parse_new(json!({
      "bannerId": "BAN001",
      "title": "Welcome",
      "imageUrl": "http://x/img.png",
      "priority": "high",
    }))
    .unwrap_err();
    assert!(err.contains("priority"));
  }
}
