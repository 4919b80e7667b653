use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};

use crate::error::{AutolinkError, Result};
use crate::resolver::ResourceLocator;
use crate::services::{ImageEncoder, ResourceLoader};

/// Guess the MIME type of an image from the extension of its path.
pub fn guess_image_mime(path: &str) -> Option<&'static str> {
  let path = path.split('?').next().unwrap_or_default();
  let extension = path.rsplit_once('.')?.1.to_ascii_lowercase();

  let mime = match extension.as_str() {
    "gif" => "image/gif",
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    "svg" => "image/svg+xml",
    "webp" => "image/webp",
    "ico" => "image/x-icon",
    "bmp" => "image/bmp",
    _ => return None,
  };
  Some(mime)
}

/// Encodes images read through a [`ResourceLoader`] as base64 `data:` URIs.
#[derive(Clone)]
pub struct Base64ImageEncoder {
  loader: Arc<dyn ResourceLoader>,
}

impl Base64ImageEncoder {
  /// Encoder reading image bytes through `loader`.
  pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
    Self { loader }
  }
}

impl ImageEncoder for Base64ImageEncoder {
  fn encode(&self, locator: &ResourceLocator) -> Result<String> {
    let mime = guess_image_mime(locator.path())
      .ok_or_else(|| AutolinkError::UnsupportedImage(locator.path().to_string()))?;
    let bytes = self.loader.load(locator)?;
    let payload = general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{payload}"))
  }
}
