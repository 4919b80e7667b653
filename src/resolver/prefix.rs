use std::fmt;

use crate::error::{AutolinkError, Result};

/// Separator closing every normalised prefix.
pub const PREFIX_SEPARATOR: &str = ":/";

/// Token of the built-in classpath root scope.
pub const CLASSPATH_ROOT_PREFIX: &str = "cp";

/// Token of the built-in web context root scope.
pub const CONTEXT_ROOT_PREFIX: &str = "ctx";

/// Scheme-like prefix identifying a scope, always ending in `:/`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prefix(String);

impl Prefix {
  /// Normalise a prefix token, appending `:/` when it is missing.
  ///
  /// Tokens must be non-empty and must not contain whitespace, quotes or parentheses, since
  /// prefixed paths appear verbatim inside markup attributes and CSS `url(...)` tokens.
  pub fn new(token: &str) -> Result<Self> {
    let bare = token.strip_suffix(PREFIX_SEPARATOR).unwrap_or(token);
    let usable = !bare.is_empty()
      && !bare
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '(' | ')'));
    if !usable {
      return Err(AutolinkError::InvalidPrefix(token.to_string()));
    }

    Ok(Self(format!("{bare}{PREFIX_SEPARATOR}")))
  }

  pub(crate) fn builtin(token: &'static str) -> Self {
    Self(format!("{token}{PREFIX_SEPARATOR}"))
  }

  /// Normalised prefix including the trailing `:/`.
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Prefix token without the trailing `:/`.
  pub fn token(&self) -> &str {
    &self.0[..self.0.len() - PREFIX_SEPARATOR.len()]
  }

  /// Whether `path` starts with this prefix.
  pub fn matches(&self, path: &str) -> bool {
    path.starts_with(&self.0)
  }

  /// Whether either prefix would also match the paths of the other.
  pub fn overlaps(&self, other: &Prefix) -> bool {
    self != other && (self.0.starts_with(&other.0) || other.0.starts_with(&self.0))
  }

  /// Remove exactly this prefix from `path`.
  pub fn strip<'a>(&self, path: &'a str) -> Result<&'a str> {
    path
      .strip_prefix(self.0.as_str())
      .ok_or_else(|| AutolinkError::PrefixMismatch {
        prefix: self.0.clone(),
        path: path.to_string(),
      })
  }
}

impl fmt::Display for Prefix {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
