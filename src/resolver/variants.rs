use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::error::{AutolinkError, Result};
use crate::paths::{escapes_root, normalize_segments};
use crate::resolver::{CLASSPATH_ROOT_PREFIX, CONTEXT_ROOT_PREFIX, Prefix, ResourceLocator, ScopeAnchor};

/// Context directory holding application-internal files, never served through `ctx:/`.
pub const PROTECTED_SEGMENT: &str = "WEB-INF";

/// Resolver for one prefix, dispatching on the kind of scope it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolver {
  /// Paths relative to an arbitrary classpath anchor.
  ClasspathScope {
    /// Anchor the paths are siblings of.
    anchor: ScopeAnchor,
    /// Prefix owned by this scope.
    prefix: Prefix,
  },
  /// Paths relative to the classpath root.
  ClasspathRoot {
    /// Prefix owned by this scope, `cp:/` by default.
    prefix: Prefix,
  },
  /// Paths relative to the web context root.
  ContextRoot {
    /// Prefix owned by this scope, `ctx:/` by default.
    prefix: Prefix,
  },
}

impl Resolver {
  /// Resolver for paths relative to `anchor` under the given prefix token.
  pub fn classpath_scope(anchor: ScopeAnchor, prefix: &str) -> Result<Self> {
    Ok(Self::ClasspathScope {
      anchor,
      prefix: Prefix::new(prefix)?,
    })
  }

  /// Built-in `cp:/` resolver.
  pub fn classpath_root() -> Self {
    Self::ClasspathRoot {
      prefix: Prefix::builtin(CLASSPATH_ROOT_PREFIX),
    }
  }

  /// Built-in `ctx:/` resolver.
  pub fn context_root() -> Self {
    Self::ContextRoot {
      prefix: Prefix::builtin(CONTEXT_ROOT_PREFIX),
    }
  }

  /// Prefix owned by this resolver.
  pub fn prefix(&self) -> &Prefix {
    match self {
      Self::ClasspathScope { prefix, .. }
      | Self::ClasspathRoot { prefix }
      | Self::ContextRoot { prefix } => prefix,
    }
  }

  /// Strip the prefix from `path` and build a locator rooted at this resolver's scope.
  pub fn resolve(&self, path: &str) -> Result<ResourceLocator> {
    let relative = self.prefix().strip(path)?;
    let locator = match self {
      Self::ClasspathScope { anchor, .. } => ResourceLocator::package(anchor.clone(), relative),
      Self::ClasspathRoot { .. } => {
        ResourceLocator::package(ScopeAnchor::classpath_root(), format!("../{relative}"))
      }
      Self::ContextRoot { .. } => {
        reject_protected_path(path, relative)?;
        ResourceLocator::context(relative)
      }
    };

    debug!(path, locator = ?locator, "resolved scoped path");
    Ok(locator)
  }

  /// Like [`Resolver::resolve`], but the locator rewrites its own `url(...)` references when
  /// it is loaded as a stylesheet.
  pub fn resolve_for_css(&self, path: &str) -> Result<ResourceLocator> {
    self.resolve(path).map(ResourceLocator::into_css)
  }
}

/// Refuse context paths reaching into the protected directory or above the context root.
///
/// The check runs on the raw path and on its percent-decoded, dot-normalised form, so neither
/// encoded characters nor `..` segments can smuggle the protected segment past it.
fn reject_protected_path(path: &str, relative: &str) -> Result<()> {
  let protected = PROTECTED_SEGMENT.to_ascii_uppercase();
  let decoded = percent_decode_str(relative).decode_utf8_lossy();
  let normalized = normalize_segments(&decoded);

  if path.to_uppercase().contains(&protected)
    || normalized.to_uppercase().contains(&protected)
    || escapes_root(&normalized)
  {
    return Err(AutolinkError::invalid_path(path));
  }

  Ok(())
}
