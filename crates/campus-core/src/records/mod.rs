//! Record types for the seven resource kinds.
//!
//! Wire names are camelCase to match the dashboard's JSON.

mod banner;
mod cell;
mod faculty;
mod gallery;
mod ipr;
mod management;
mod news;

pub use banner::{Banner, BannerPatch, NewBanner};
pub use cell::{Cell, CellPatch, NewCell};
pub use faculty::{Faculty, FacultyPatch, Gender, NewFaculty};
pub use gallery::{GalleryItem, GalleryPatch, NewGalleryItem};
pub use ipr::{Ipr, IprPatch, NewIpr};
pub use management::{ManagementMember, ManagementPatch, NewManagementMember};
pub use news::{Importance, NewNews, News, NewsPatch};

use serde::{Deserialize, Deserializer};

/// Deserialize a patch field that distinguishes "absent" (`None`) from an
/// explicit `null` (`Some(None)`). Pair with `#[serde(default)]`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

/// Overwrite `slot` when the patch supplied a value.
fn merge<T>(slot: &mut T, value: Option<T>) {
  if let Some(v) = value {
    *slot = v;
  }
}
