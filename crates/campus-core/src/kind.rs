//! Resource kinds: the independently stored collection types.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// One of the seven CRUD collections managed by the portal.
///
/// The string form (`faculty`, `banner`, ...) is used as the storage tag;
/// [`ResourceKind::path`] gives the REST path segment.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
  Faculty,
  Banner,
  News,
  Ipr,
  Management,
  Cell,
  Gallery,
}

impl ResourceKind {
  /// Path segment under `/api`, e.g. `banners` for [`ResourceKind::Banner`].
  pub fn path(self) -> &'static str {
    match self {
      Self::Faculty => "faculty",
      Self::Banner => "banners",
      Self::News => "news",
      Self::Ipr => "ipr",
      Self::Management => "management",
      Self::Cell => "cells",
      Self::Gallery => "gallery",
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn storage_tag_round_trips() {
    for kind in ResourceKind::iter() {
      assert_eq!(ResourceKind::from_str(kind.as_ref()).unwrap(), kind);
    }
  }

  #[test]
  fn paths_are_distinct() {
    let mut paths: Vec<_> = ResourceKind::iter().map(ResourceKind::path).collect();
    paths.sort_unstable();
    paths.dedup();
    assert_eq!(paths.len(), 7);
  }

  #[test]
  fn tag_differs_from_path_for_plural_kinds() {
    assert_eq!(ResourceKind::Banner.to_string(), "banner");
    assert_eq!(ResourceKind::Banner.path(), "banners");
    assert_eq!(ResourceKind::Cell.path(), "cells");
  }
}
