//! File Helper. Persists uploaded bytes and maps them to public URLs.
//!
//! Files land at `<root>/<category>/<millis>-<original name>` and are
//! addressed as `<base_url>/uploads/<category>/<millis>-<original name>`.
//! Deletion derives the path back from that URL and is best-effort.

use std::{
  io,
  path::{Path, PathBuf},
};

use chrono::Utc;
use tokio::{fs::OpenOptions, io::AsyncWriteExt as _};
use tracing::{debug, info, warn};

/// URL path prefix under which the server exposes `root`.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Suffixed names tried when `<millis>-<name>` is already taken.
const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone)]
pub struct FileStore {
  root:     PathBuf,
  base_url: String,
}

impl FileStore {
  pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
    Self {
      root:     root.into(),
      base_url: base_url.into().trim_end_matches('/').to_owned(),
    }
  }

  /// Directory that backs [`UPLOADS_PREFIX`].
  pub fn root(&self) -> &Path { &self.root }

  /// Write `bytes` under `category` and return the URL that serves them.
  ///
  /// Only the final component of `original_name` is kept. An existing file
  /// is never overwritten: a name taken within the same millisecond gets a
  /// numeric suffix. A write failure is returned to the caller.
  pub async fn save(
    &self,
    category: &str,
    original_name: &str,
    bytes: &[u8],
  ) -> io::Result<String> {
    if !is_segment(category) {
      return Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("invalid upload category {category:?}"),
      ));
    }

    let name = Path::new(original_name)
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .filter(|n| is_segment(n))
      .unwrap_or_else(|| "upload".to_owned());

    let dir = self.root.join(category);
    tokio::fs::create_dir_all(&dir).await?;
    let (file_name, mut file) =
      create_unique(&dir, Utc::now().timestamp_millis(), &name).await?;
    let path = dir.join(&file_name);

    let written = async {
      file.write_all(bytes).await?;
      file.flush().await
    }
    .await;
    if let Err(e) = written {
      drop(file);
      let _ = tokio::fs::remove_file(&path).await;
      return Err(e);
    }
    debug!(path = %path.display(), bytes = bytes.len(), "stored upload");

    Ok(format!("{}{UPLOADS_PREFIX}/{category}/{file_name}", self.base_url))
  }

  /// Remove the file behind a URL returned by [`FileStore::save`].
  ///
  /// Never fails: an unknown URL or missing file is logged and ignored.
  pub async fn delete(&self, url: &str) {
    let Some(path) = self.path_for_url(url) else {
      warn!(url, "not an upload URL, nothing to delete");
      return;
    };

    match tokio::fs::remove_file(&path).await {
      Ok(()) => info!(path = %path.display(), "file deleted"),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        warn!(path = %path.display(), "file not found to delete")
      }
      Err(e) => warn!(path = %path.display(), error = %e, "failed to delete file"),
    }
  }

  /// On-disk path for an upload URL, or `None` unless the URL is
  /// `<base_url>/uploads/<category>/<file>`. URLs on any other origin never
  /// map to a stored file.
  pub fn path_for_url(&self, url: &str) -> Option<PathBuf> {
    let rest = url
      .strip_prefix(self.base_url.as_str())?
      .strip_prefix(UPLOADS_PREFIX)?
      .strip_prefix('/')?;
    let rest = rest.split(['?', '#']).next()?;
    let (category, file_name) = rest.split_once('/')?;
    (is_segment(category) && is_segment(file_name))
      .then(|| self.root.join(category).join(file_name))
  }
}

/// Create `<stamp>-<name>` in `dir`, or `<stamp>-<n>-<name>` if taken.
async fn create_unique(
  dir: &Path,
  stamp: i64,
  name: &str,
) -> io::Result<(String, tokio::fs::File)> {
  for attempt in 0..MAX_NAME_ATTEMPTS {
    let file_name = match attempt {
      0 => format!("{stamp}-{name}"),
      n => format!("{stamp}-{n}-{name}"),
    };
    match OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(dir.join(&file_name))
      .await
    {
      Ok(file) => return Ok((file_name, file)),
      Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
      Err(e) => return Err(e),
    }
  }
  Err(io::Error::new(
    io::ErrorKind::AlreadyExists,
    format!("no free file name for {name:?}"),
  ))
}

/// A single, non-traversing path component.
fn is_segment(s: &str) -> bool {
  !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store(dir: &tempfile::TempDir) -> FileStore {
    FileStore::new(dir.path(), "http://localhost:5000/")
  }

  #[tokio::test]
  async fn save_then_delete_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let files = store(&dir);

    let url = files.save("faculty", "portrait.png", b"\x89PNG").await.unwrap();
    assert!(url.starts_with("http://localhost:5000/uploads/faculty/"), "{url}");
    assert!(url.ends_with("-portrait.png"), "{url}");

    let path = files.path_for_url(&url).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG");

    files.delete(&url).await;
    assert!(!path.exists());

    // Second delete of the same URL is a logged no-op.
    files.delete(&url).await;
    assert!(!path.exists());
  }

  #[tokio::test]
  async fn original_name_cannot_escape_category() {
    let dir = tempfile::tempdir().unwrap();
    let files = store(&dir);

    let url = files.save("faculty", "../../etc/passwd", b"x").await.unwrap();
    let path = files.path_for_url(&url).unwrap();
    assert!(path.starts_with(dir.path().join("faculty")));
    assert!(url.ends_with("-passwd"));
  }

  #[tokio::test]
  async fn rejects_category_with_separator() {
    let dir = tempfile::tempdir().unwrap();
    let err = store(&dir).save("../faculty", "a.png", b"x").await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
  }

  #[test]
  fn foreign_urls_map_to_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let files = store(&dir);
    assert!(files.path_for_url("http://localhost:5000/img.png").is_none());
    assert!(files.path_for_url("http://localhost:5000/uploads/faculty").is_none());
    assert!(files.path_for_url("http://localhost:5000/uploads/../secret/a.png").is_none());
    assert_eq!(
      files.path_for_url("http://localhost:5000/uploads/gallery/1-a.png?v=2"),
      Some(dir.path().join("gallery").join("1-a.png"))
    );
  }

  #[test]
  fn other_origins_do_not_own_local_files() {
    let dir = tempfile::tempdir().unwrap();
    let files = store(&dir);
    assert!(files.path_for_url("https://cdn.example.com/uploads/faculty/1-a.png").is_none());
    assert!(files.path_for_url("http://localhost:5000.evil.test/uploads/faculty/1-a.png").is_none());
    assert!(files.path_for_url("/uploads/faculty/1-a.png").is_none());
  }

  #[tokio::test]
  async fn same_name_saved_twice_keeps_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let files = store(&dir);

    let mut urls = Vec::new();
    for i in 0..20u8 {
      urls.push(files.save("faculty", "photo.png", &[i]).await.unwrap());
    }

    let mut distinct = urls.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), urls.len());

    for (i, url) in urls.iter().enumerate() {
      let path = files.path_for_url(url).unwrap();
      assert_eq!(std::fs::read(path).unwrap(), vec![i as u8]);
    }
  }

  #[tokio::test]
  async fn taken_name_gets_a_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let first = create_unique(dir.path(), 42, "a.png").await.unwrap().0;
    let second = create_unique(dir.path(), 42, "a.png").await.unwrap().0;
    assert_eq!(first, "42-a.png");
    assert_eq!(second, "42-1-a.png");
  }

  #[tokio::test]
  async fn delete_of_foreign_url_does_not_fail() {
    let dir = tempfile::tempdir().unwrap();
    store(&dir).delete("https://cdn.example.com/banner.jpg").await;
  }
}
