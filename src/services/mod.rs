//! Collaborators the resolution engine depends on but does not own.
//!
//! Rendering a locator as a URL, loading resource bytes, encoding images as data URIs and
//! minifying stylesheets belong to the hosting application. Each concern is a trait so that
//! applications can plug in their own implementations; the submodules provide filesystem and
//! mount-point based defaults.

mod embed;
mod fs_loader;
mod render;

pub use embed::{Base64ImageEncoder, guess_image_mime};
pub use fs_loader::FsResourceLoader;
pub use render::{DEFAULT_CONTEXT_MOUNT, DEFAULT_RESOURCE_MOUNT, MountedUrlRenderer};

use crate::error::Result;
use crate::resolver::ResourceLocator;

/// Turns a resolved locator into a servable URL string.
pub trait UrlRenderer: Send + Sync {
  /// URL under which the resource of `locator` is served.
  fn url_for(&self, locator: &ResourceLocator) -> Result<String>;
}

/// Reads the raw bytes behind a locator.
pub trait ResourceLoader: Send + Sync {
  /// Load the resource, failing with [`crate::AutolinkError::ResourceNotFound`] when absent.
  fn load(&self, locator: &ResourceLocator) -> Result<Vec<u8>>;
}

/// Produces a `data:` URI for an image resource.
pub trait ImageEncoder: Send + Sync {
  /// Encode the image behind `locator`.
  fn encode(&self, locator: &ResourceLocator) -> Result<String>;
}

/// Minifier applied to stylesheet text before `url(...)` scanning.
pub trait CssCompressor: Send + Sync {
  /// Compress the whole stylesheet.
  fn compress(&self, css: &str) -> String;
}

impl<F> ImageEncoder for F
where
  F: Fn(&ResourceLocator) -> Result<String> + Send + Sync,
{
  fn encode(&self, locator: &ResourceLocator) -> Result<String> {
    self(locator)
  }
}

impl<F> CssCompressor for F
where
  F: Fn(&str) -> String + Send + Sync,
{
  fn compress(&self, css: &str) -> String {
    self(css)
  }
}
