//! Application configuration describing scope roots, mount points and custom scopes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::autolinker::Autolinker;
use crate::resolver::ScopeAnchor;
use crate::services::{
  DEFAULT_CONTEXT_MOUNT, DEFAULT_RESOURCE_MOUNT, FsResourceLoader, MountedUrlRenderer,
};

/// File name looked up by [`AutolinkConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "autolink.config.json";

/// A custom classpath scope declared in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScopeConfig {
  /// Prefix token, with or without the trailing `:/`.
  pub prefix: String,
  /// Name identifying the anchor in rendered URLs.
  pub anchor: String,
  /// Directory of the anchor below the classpath root.
  pub package: String,
}

/// Discoverable configuration for the filesystem-backed autolinker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AutolinkConfig {
  /// Directory backing `cp:/` and every classpath scope.
  pub classpath_root: PathBuf,
  /// Directory backing `ctx:/`, the web application root.
  pub context_root: PathBuf,
  /// URL prefix under which classpath resources are served.
  pub resource_mount: String,
  /// URL prefix under which context resources are served.
  pub context_mount: String,
  /// Custom scopes registered on top of the built-in ones.
  pub scopes: Vec<ScopeConfig>,
}

impl Default for AutolinkConfig {
  fn default() -> Self {
    Self {
      classpath_root: PathBuf::from("classes"),
      context_root: PathBuf::from("webapp"),
      resource_mount: DEFAULT_RESOURCE_MOUNT.into(),
      context_mount: DEFAULT_CONTEXT_MOUNT.into(),
      scopes: Vec::new(),
    }
  }
}

impl AutolinkConfig {
  /// Load [`DEFAULT_CONFIG_FILE`] from `dir`, falling back to defaults.
  ///
  /// A missing file is expected; a file that fails to parse is reported and ignored.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if !candidate.is_file() {
      return Self::default();
    }

    Self::from_path(&candidate).unwrap_or_else(|err| {
      let reason = format!("{err:#}");
      warn!(path = %candidate.display(), %reason, "ignoring unreadable config");
      Self::default()
    })
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Result<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config = serde_json::from_str(&content)
      .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(config)
  }

  /// Build an autolinker backed by the configured directories and mount points.
  pub fn into_autolinker(self) -> crate::Result<Autolinker> {
    let loader = FsResourceLoader::new(self.classpath_root, self.context_root);
    let mut builder = Autolinker::builder(loader)
      .renderer(MountedUrlRenderer::new(&self.resource_mount, &self.context_mount));

    for scope in self.scopes {
      builder = builder.scope(ScopeAnchor::new(scope.anchor, &scope.package), &scope.prefix)?;
    }

    Ok(builder.build())
  }
}
