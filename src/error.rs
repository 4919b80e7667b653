//! Error types surfaced by resolution, loading and CSS rewriting.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed cause attached to errors raised by external collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AutolinkError>;

/// Everything that can go wrong while resolving or rewriting a reference.
#[derive(Debug, Error)]
pub enum AutolinkError {
  /// A context-root reference targets a protected or escaping path.
  #[error("context resources cannot be taken from protected locations, offending path: {path}")]
  InvalidPath {
    /// The path exactly as it was requested.
    path: String,
  },

  /// A `?embedBase64` image could not be loaded or encoded.
  #[error("error while embedding an image into the css: {reference}")]
  UnresolvedReference {
    /// The resolved image reference that failed.
    reference: String,
    /// Underlying loader or encoder failure.
    #[source]
    source: BoxError,
  },

  /// A registration would make two prefixes match the same paths.
  #[error("prefix `{prefix}` overlaps the registered prefix `{existing}`")]
  AmbiguousPrefix {
    /// Normalised prefix being registered.
    prefix: String,
    /// Already registered prefix it collides with.
    existing: String,
  },

  /// A custom scope tried to take over a built-in prefix.
  #[error("prefix `{0}` is reserved for a built-in scope")]
  ReservedPrefix(String),

  /// The prefix token cannot be used inside markup or CSS references.
  #[error("invalid scope prefix `{0}`")]
  InvalidPrefix(String),

  /// A resolver was handed a path that does not carry its prefix.
  #[error("path `{path}` does not start with prefix `{prefix}`")]
  PrefixMismatch {
    /// Prefix of the resolver.
    prefix: String,
    /// Path handed to it.
    path: String,
  },

  /// The loader has no resource for a locator.
  #[error("resource not found: {0}")]
  ResourceNotFound(String),

  /// Reading a backing file failed.
  #[error("IO error when reading `{0}`")]
  Io(PathBuf, #[source] std::io::Error),

  /// A stylesheet body is not valid UTF-8.
  #[error("stylesheet `{0}` is not valid UTF-8")]
  InvalidEncoding(String),

  /// No MIME type is known for an image that should be embedded.
  #[error("cannot determine image type of `{0}`")]
  UnsupportedImage(String),
}

impl AutolinkError {
  pub(crate) fn invalid_path(path: impl Into<String>) -> Self {
    Self::InvalidPath { path: path.into() }
  }

  pub(crate) fn unresolved(reference: impl Into<String>, source: impl Into<BoxError>) -> Self {
    Self::UnresolvedReference {
      reference: reference.into(),
      source: source.into(),
    }
  }
}
