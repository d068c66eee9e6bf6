use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::merge;
use crate::{
  kind::ResourceKind,
  resource::Resource,
  validate::{FieldKind, FieldRule},
};

/// A gallery photo. Listed newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
  pub id:         i64,
  pub gallery_id: String,
  pub year:       String,
  pub category:   String,
  pub title:      String,
  pub image_url:  String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGalleryItem {
  pub gallery_id: String,
  pub year:       String,
  pub category:   String,
  pub title:      String,
  pub image_url:  String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryPatch {
  pub gallery_id: Option<String>,
  pub year:       Option<String>,
  pub category:   Option<String>,
  pub title:      Option<String>,
  pub image_url:  Option<String>,
}

impl Resource for GalleryItem {
  type New = NewGalleryItem;
  type Patch = GalleryPatch;

  const KIND: ResourceKind = ResourceKind::Gallery;
  const RULES: &'static [FieldRule] = &[
    FieldRule::required("galleryId", FieldKind::Text),
    FieldRule::required("year", FieldKind::Text),
    FieldRule::required("category", FieldKind::Text),
    FieldRule::required("title", FieldKind::Text),
    FieldRule::required("imageUrl", FieldKind::Text),
  ];

  fn id(&self) -> i64 { self.id }

  fn business_key(&self) -> &str { &self.gallery_id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn from_new(id: i64, now: DateTime<Utc>, new: NewGalleryItem) -> Self {
    Self {
      id,
      gallery_id: new.gallery_id,
      year: new.year,
      category: new.category,
      title: new.title,
      image_url: new.image_url,
      created_at: now,
    }
  }

  fn apply(&mut self, patch: GalleryPatch) {
    merge(&mut self.gallery_id, patch.gallery_id);
    merge(&mut self.year, patch.year);
    merge(&mut self.category, patch.category);
    merge(&mut self.title, patch.title);
    merge(&mut self.image_url, patch.image_url);
  }

  fn listing_order(a: &Self, b: &Self) -> Ordering { b.created_at.cmp(&a.created_at) }
}
