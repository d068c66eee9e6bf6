use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{merge, nullable};
use crate::{
  kind::ResourceKind,
  resource::Resource,
  validate::{FieldKind, FieldRule},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
  High,
  Medium,
  Low,
}

/// A news item. Listed newest `publishDate` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
  pub id:           i64,
  pub news_id:      String,
  pub title:        String,
  pub description:  String,
  pub importance:   Importance,
  pub link:         Option<String>,
  pub publish_date: DateTime<Utc>,
  pub created_at:   DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNews {
  pub news_id:      String,
  pub title:        String,
  pub description:  String,
  pub importance:   Importance,
  #[serde(default)]
  pub link:         Option<String>,
  /// Defaults to the creation time.
  pub publish_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPatch {
  pub news_id:      Option<String>,
  pub title:        Option<String>,
  pub description:  Option<String>,
  pub importance:   Option<Importance>,
  #[serde(default, deserialize_with = "nullable")]
  pub link:         Option<Option<String>>,
  pub publish_date: Option<DateTime<Utc>>,
}

impl Resource for News {
  type New = NewNews;
  type Patch = NewsPatch;

  const KIND: ResourceKind = ResourceKind::News;
  const RULES: &'static [FieldRule] = &[
    FieldRule::required("newsId", FieldKind::Text),
    FieldRule::required("title", FieldKind::Text),
    FieldRule::required("description", FieldKind::Text),
    FieldRule::required("importance", FieldKind::OneOf(&["high", "medium", "low"])),
    FieldRule::optional("link", FieldKind::Text).nullable(),
    FieldRule::optional("publishDate", FieldKind::Timestamp),
  ];

  fn id(&self) -> i64 { self.id }

  fn business_key(&self) -> &str { &self.news_id }

  fn created_at(&self) -> DateTime<Utc> { self.created_at }

  fn from_new(id: i64, now: DateTime<Utc>, new: NewNews) -> Self {
    Self {
      id,
      news_id: new.news_id,
      title: new.title,
      description: new.description,
      importance: new.importance,
      link: new.link,
      publish_date: new.publish_date.unwrap_or(now),
      created_at: now,
    }
  }

  fn apply(&mut self, patch: NewsPatch) {
    merge(&mut self.news_id, patch.news_id);
    merge(&mut self.title, patch.title);
    merge(&mut self.description, patch.description);
    merge(&mut self.importance, patch.importance);
    merge(&mut self.link, patch.link);
    merge(&mut self.publish_date, patch.publish_date);
  }

  fn listing_order(a: &Self, b: &Self) -> Ordering {
    b.publish_date
      .cmp(&a.publish_date)
      .then_with(|| b.created_at.cmp(&a.created_at))
  }
}
