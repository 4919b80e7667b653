use crate::error::Result;
use crate::resolver::{LocatorKind, ResourceLocator};
use crate::services::UrlRenderer;

/// Default mount point of classpath resources.
pub const DEFAULT_RESOURCE_MOUNT: &str = "./wicket/resource";

/// Default mount point of context resources.
pub const DEFAULT_CONTEXT_MOUNT: &str = ".";

/// Renders locators below fixed mount points.
///
/// Package resources become `<resource_mount>/<anchor name>/<path>`, where parent segments are
/// written as `::` so that the URL cannot climb out of the mount. Context resources become
/// `<context_mount>/<path>`.
#[derive(Debug, Clone)]
pub struct MountedUrlRenderer {
  resource_mount: String,
  context_mount: String,
}

impl MountedUrlRenderer {
  /// Renderer using the given mount points; trailing slashes are ignored.
  pub fn new(resource_mount: impl AsRef<str>, context_mount: impl AsRef<str>) -> Self {
    Self {
      resource_mount: resource_mount.as_ref().trim_end_matches('/').to_string(),
      context_mount: context_mount.as_ref().trim_end_matches('/').to_string(),
    }
  }
}

impl Default for MountedUrlRenderer {
  fn default() -> Self {
    Self::new(DEFAULT_RESOURCE_MOUNT, DEFAULT_CONTEXT_MOUNT)
  }
}

impl UrlRenderer for MountedUrlRenderer {
  fn url_for(&self, locator: &ResourceLocator) -> Result<String> {
    let url = match locator.kind() {
      LocatorKind::Package(anchor) => format!(
        "{}/{}/{}",
        self.resource_mount,
        anchor.name(),
        encode_parent_segments(locator.path())
      ),
      LocatorKind::Context => format!(
        "{}/{}",
        self.context_mount,
        locator.path().trim_start_matches('/')
      ),
    };
    Ok(url)
  }
}

fn encode_parent_segments(path: &str) -> String {
  let (path, query) = match path.split_once('?') {
    Some((path, query)) => (path, Some(query)),
    None => (path, None),
  };

  let encoded = path
    .split('/')
    .map(|segment| if segment == ".." { "::" } else { segment })
    .collect::<Vec<_>>()
    .join("/");

  match query {
    Some(query) => format!("{encoded}?{query}"),
    None => encoded,
  }
}
