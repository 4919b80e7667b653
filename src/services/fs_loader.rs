//! Filesystem-backed resource loading for the classpath and context roots.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AutolinkError, Result};
use crate::paths::{escapes_root, normalize_segments};
use crate::resolver::{LocatorKind, ResourceLocator};
use crate::services::ResourceLoader;

/// Loads package resources below `classpath_root` and context resources below `context_root`.
#[derive(Debug, Clone)]
pub struct FsResourceLoader {
  classpath_root: PathBuf,
  context_root: PathBuf,
}

impl FsResourceLoader {
  /// Create a loader for the two directories.
  pub fn new(classpath_root: impl Into<PathBuf>, context_root: impl Into<PathBuf>) -> Self {
    Self {
      classpath_root: classpath_root.into(),
      context_root: context_root.into(),
    }
  }

  /// Directory backing classpath resources.
  pub fn classpath_root(&self) -> &Path {
    &self.classpath_root
  }

  /// Directory backing context resources.
  pub fn context_root(&self) -> &Path {
    &self.context_root
  }

  /// File backing `locator`, refusing locations outside of its root.
  pub fn file_path(&self, locator: &ResourceLocator) -> Result<PathBuf> {
    let (root, relative) = match locator.kind() {
      LocatorKind::Package(anchor) => (&self.classpath_root, anchor.sibling(locator.path())),
      LocatorKind::Context => (&self.context_root, locator.path().to_string()),
    };

    let without_query = relative.split('?').next().unwrap_or_default();
    let normalized = normalize_segments(without_query);
    if normalized.is_empty() || escapes_root(&normalized) {
      return Err(AutolinkError::invalid_path(locator.path()));
    }

    Ok(root.join(normalized))
  }
}

impl ResourceLoader for FsResourceLoader {
  fn load(&self, locator: &ResourceLocator) -> Result<Vec<u8>> {
    let path = self.file_path(locator)?;
    debug!(path = %path.display(), "loading resource");

    fs::read(&path).map_err(|err| match err.kind() {
      ErrorKind::NotFound => AutolinkError::ResourceNotFound(path.display().to_string()),
      _ => AutolinkError::Io(path, err),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::resolver::ScopeAnchor;
  use tempfile::tempdir;

  fn write_file(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
  }

  #[test]
  fn loads_package_and_context_resources() {
    let dir = tempdir().unwrap();
    let classes = dir.path().join("classes");
    let webapp = dir.path().join("webapp");
    write_file(&classes.join("com/example/res/test.png"), b"png");
    write_file(&webapp.join("res/test.css"), b"css");

    let loader = FsResourceLoader::new(&classes, &webapp);
    let anchor = ScopeAnchor::new("com.example.res.Scope", "com/example/res");

    let png = loader
      .load(&ResourceLocator::package(anchor, "test.png?v=2"))
      .unwrap();
    assert_eq!(png, b"png");

    let root = ScopeAnchor::classpath_root();
    let same = loader
      .load(&ResourceLocator::package(root, "../com/example/res/test.png"))
      .unwrap();
    assert_eq!(same, b"png");

    let css = loader.load(&ResourceLocator::context("res/test.css")).unwrap();
    assert_eq!(css, b"css");
  }

  #[test]
  fn reports_missing_resources() {
    let dir = tempdir().unwrap();
    let loader = FsResourceLoader::new(dir.path(), dir.path());
    let err = loader
      .load(&ResourceLocator::context("missing.png"))
      .unwrap_err();
    assert!(matches!(err, AutolinkError::ResourceNotFound(_)));
  }

  #[test]
  fn refuses_paths_escaping_the_root() {
    let dir = tempdir().unwrap();
    let loader = FsResourceLoader::new(dir.path(), dir.path());
    let err = loader
      .file_path(&ResourceLocator::context("res/../../etc/passwd"))
      .unwrap_err();
    assert!(matches!(err, AutolinkError::InvalidPath { .. }));
  }
}
