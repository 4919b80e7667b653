use serde::{Deserialize, Serialize};

/// Classpath anchor relative to which scoped paths are resolved.
///
/// `name` identifies the anchor in rendered URLs (a dotted, class-like name), `package` is the
/// `/`-separated directory the anchor lives in. Paths under the anchor are its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ScopeAnchor {
  name: String,
  package: String,
}

impl ScopeAnchor {
  /// Create an anchor, normalising separators of the package directory.
  pub fn new(name: impl Into<String>, package: impl AsRef<str>) -> Self {
    Self {
      name: name.into(),
      package: package
        .as_ref()
        .replace('\\', "/")
        .trim_matches('/')
        .to_string(),
    }
  }

  /// Fixed anchor standing in for the classpath root, which cannot be referenced directly.
  ///
  /// It lives in a one-level package, so prefixing `../` to a path lands on the true root.
  pub fn classpath_root() -> Self {
    Self::new("_cp._", "_cp")
  }

  /// Identifier used when rendering URLs.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Directory containing the anchor.
  pub fn package(&self) -> &str {
    &self.package
  }

  /// Location of a sibling resource, not yet normalised.
  pub fn sibling(&self, relative_path: &str) -> String {
    if self.package.is_empty() {
      relative_path.to_string()
    } else {
      format!("{}/{}", self.package, relative_path)
    }
  }
}

/// Where a locator points.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocatorKind {
  /// Classpath resource next to the anchor.
  Package(ScopeAnchor),
  /// Resource below the web context root.
  Context,
}

/// Framework-level handle to a resource that can be rendered as a URL or loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocator {
  kind: LocatorKind,
  path: String,
  css: bool,
}

impl ResourceLocator {
  /// Locator for a classpath resource next to `anchor`.
  pub fn package(anchor: ScopeAnchor, path: impl Into<String>) -> Self {
    Self {
      kind: LocatorKind::Package(anchor),
      path: path.into(),
      css: false,
    }
  }

  /// Locator for a resource below the web context root.
  pub fn context(path: impl Into<String>) -> Self {
    Self {
      kind: LocatorKind::Context,
      path: path.into(),
      css: false,
    }
  }

  /// Mark the locator as a stylesheet whose body is rewritten when loaded.
  pub fn into_css(mut self) -> Self {
    self.css = true;
    self
  }

  /// What the locator is rooted at.
  pub fn kind(&self) -> &LocatorKind {
    &self.kind
  }

  /// Path relative to the root of the locator.
  pub fn path(&self) -> &str {
    &self.path
  }

  /// Whether loading this locator pipes its body through the CSS rewriter.
  pub fn is_css(&self) -> bool {
    self.css
  }

  /// Classpath anchor of the locator, `None` for context resources.
  pub fn scope(&self) -> Option<&ScopeAnchor> {
    match &self.kind {
      LocatorKind::Package(anchor) => Some(anchor),
      LocatorKind::Context => None,
    }
  }
}
