use std::fmt;

use crate::paths::normalize_segments;

/// Query parameter asking for an image to be inlined as a base64 data URI.
pub const EMBED_BASE64: &str = "embedBase64";

/// A stylesheet reference resolved against the location of its stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
  path: String,
  query: Option<String>,
}

/// Resolve `reference` relative to the directory of the stylesheet at `document`.
///
/// The file name of `document` is dropped, the segments of `reference` are appended and the
/// `.`/`..` segments are collapsed. Surplus `..` segments survive so that a stylesheet at the
/// scope root can still point above it. The query of the document is discarded and replaced by
/// the query of the reference.
pub fn resolve_relative(document: &str, reference: &str) -> ResolvedReference {
  let (document_path, _) = split_query(document);
  let document_path = document_path.replace('\\', "/");
  let directory = document_path
    .rfind('/')
    .map(|index| &document_path[..index])
    .unwrap_or("");

  let (reference_path, query) = split_query(reference);
  let joined = if directory.is_empty() {
    reference_path.to_string()
  } else {
    format!("{directory}/{reference_path}")
  };

  ResolvedReference {
    path: normalize_segments(&joined),
    query: query
      .filter(|value| !value.is_empty())
      .map(str::to_string),
  }
}

impl ResolvedReference {
  /// Scope-relative path without query.
  pub fn path(&self) -> &str {
    &self.path
  }

  /// Query string without the leading `?`.
  pub fn query(&self) -> Option<&str> {
    self.query.as_deref()
  }

  /// Whether the query carries the [`EMBED_BASE64`] marker.
  pub fn embeds_base64(&self) -> bool {
    self
      .query_parameters()
      .any(|parameter| parameter_name(parameter) == EMBED_BASE64)
  }

  /// Copy of this reference with the [`EMBED_BASE64`] marker removed from its query.
  pub fn without_embed_marker(&self) -> Self {
    let remaining: Vec<&str> = self
      .query_parameters()
      .filter(|parameter| parameter_name(parameter) != EMBED_BASE64)
      .collect();

    Self {
      path: self.path.clone(),
      query: (!remaining.is_empty()).then(|| remaining.join("&")),
    }
  }

  fn query_parameters(&self) -> impl Iterator<Item = &str> {
    self
      .query
      .as_deref()
      .unwrap_or("")
      .split('&')
      .filter(|parameter| !parameter.is_empty())
  }
}

impl fmt::Display for ResolvedReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.query {
      Some(query) => write!(f, "{}?{}", self.path, query),
      None => f.write_str(&self.path),
    }
  }
}

fn split_query(value: &str) -> (&str, Option<&str>) {
  match value.split_once('?') {
    Some((path, query)) => (path, Some(query)),
    None => (value, None),
  }
}

fn parameter_name(parameter: &str) -> &str {
  parameter
    .split_once('=')
    .map(|(name, _)| name)
    .unwrap_or(parameter)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolves_sibling_of_stylesheet() {
    let resolved = resolve_relative("res/css/some.css", "some.img");
    assert_eq!(resolved.to_string(), "res/css/some.img");
  }

  #[test]
  fn resolves_parent_folder_references() {
    let resolved = resolve_relative("res/css/some.css", "../images/some.img");
    assert_eq!(resolved.to_string(), "res/images/some.img");
  }

  #[test]
  fn resolves_current_folder_references() {
    let resolved = resolve_relative("res/css/some.css", "./images/some.img");
    assert_eq!(resolved.to_string(), "res/css/images/some.img");
  }

  #[test]
  fn escalates_through_several_parent_segments() {
    let resolved = resolve_relative("a/b/c/d.css", "../../../x/y.png");
    assert_eq!(resolved.to_string(), "x/y.png");
  }

  #[test]
  fn handles_stylesheet_at_scope_root() {
    assert_eq!(resolve_relative("some.css", "Beer.gif").path(), "Beer.gif");
    assert_eq!(resolve_relative("some.css", "../up.gif").path(), "../up.gif");
  }

  #[test]
  fn keeps_query_of_reference_only() {
    let resolved = resolve_relative("res/some.css?v=1", "a.png?x=2");
    assert_eq!(resolved.path(), "res/a.png");
    assert_eq!(resolved.query(), Some("x=2"));
    assert!(!resolved.embeds_base64());
  }

  #[test]
  fn strips_embed_marker_from_query() {
    let resolved = resolve_relative("some.css", "icon.gif?embedBase64");
    assert!(resolved.embeds_base64());
    assert_eq!(resolved.without_embed_marker().to_string(), "icon.gif");

    let mixed = resolve_relative("some.css", "icon.gif?v=3&embedBase64");
    assert!(mixed.embeds_base64());
    assert_eq!(mixed.without_embed_marker().to_string(), "icon.gif?v=3");
  }
}
