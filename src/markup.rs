//! Attribute-level autolinking for markup tags.
//!
//! Parsing markup stays with the host framework. It hands over the name and attributes of one
//! tag at a time and gets back the attribute value to write, if the tag references a scoped
//! resource.

use crate::autolinker::Autolinker;
use crate::error::Result;

/// Attribute rewrite produced for one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRewrite {
  /// Attribute to overwrite, `src` or `href`.
  pub attribute: &'static str,
  /// Rendered URL of the resolved resource.
  pub url: String,
}

fn attribute<'a>(attributes: &[(&str, &'a str)], name: &str) -> Option<&'a str> {
  attributes
    .iter()
    .find(|(key, _)| key.eq_ignore_ascii_case(name))
    .map(|(_, value)| *value)
}

/// The attribute that carries the reference of a tag: `src` when present, `href` otherwise.
fn candidate<'a>(attributes: &[(&str, &'a str)]) -> Option<(&'static str, &'a str)> {
  attribute(attributes, "src")
    .map(|value| ("src", value))
    .or_else(|| attribute(attributes, "href").map(|value| ("href", value)))
}

fn is_stylesheet_link(tag_name: &str, attributes: &[(&str, &str)]) -> bool {
  tag_name.eq_ignore_ascii_case("link")
    && attribute(attributes, "rel").is_some_and(|rel| rel.eq_ignore_ascii_case("stylesheet"))
}

impl Autolinker {
  /// Whether the reference attribute of a tag carries a registered prefix.
  pub fn is_autolink_candidate(&self, attributes: &[(&str, &str)]) -> bool {
    candidate(attributes).is_some_and(|(_, value)| self.resolver_for(value).is_some())
  }

  /// Resolve the reference attribute of a tag.
  ///
  /// Stylesheet links resolve through [`crate::Resolver::resolve_for_css`], so the stylesheet
  /// rewrites its own references when it is served. Tags without a registered prefix yield
  /// `Ok(None)` and are left to the host framework.
  pub fn autolink_tag(
    &self,
    tag_name: &str,
    attributes: &[(&str, &str)],
  ) -> Result<Option<TagRewrite>> {
    let Some((name, value)) = candidate(attributes) else {
      return Ok(None);
    };
    let Some(resolver) = self.resolver_for(value) else {
      return Ok(None);
    };

    let locator = if is_stylesheet_link(tag_name, attributes) {
      resolver.resolve_for_css(value)?
    } else {
      resolver.resolve(value)?
    };

    Ok(Some(TagRewrite {
      attribute: name,
      url: self.url_for(&locator)?,
    }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::AutolinkError;
  use crate::resolver::ScopeAnchor;
  use crate::services::{FsResourceLoader, MountedUrlRenderer};

  fn autolinker() -> Autolinker {
    Autolinker::builder(FsResourceLoader::new("classes", "webapp"))
      .renderer(MountedUrlRenderer::new("../resource", ".."))
      .scope(ScopeAnchor::new("com.example.res.Scope", "com/example/res"), "testscope")
      .unwrap()
      .build()
  }

  #[test]
  fn rewrites_image_sources() {
    let rewrite = autolinker()
      .autolink_tag("img", &[("src", "cp:/com/example/res/test.png"), ("alt", "x")])
      .unwrap()
      .unwrap();
    assert_eq!(rewrite.attribute, "src");
    assert_eq!(rewrite.url, "../resource/_cp._/::/com/example/res/test.png");
  }

  #[test]
  fn rewrites_stylesheet_links() {
    let rewrite = autolinker()
      .autolink_tag("link", &[("rel", "stylesheet"), ("href", "testscope:/test.css")])
      .unwrap()
      .unwrap();
    assert_eq!(rewrite.attribute, "href");
    assert_eq!(rewrite.url, "../resource/com.example.res.Scope/test.css");
  }

  #[test]
  fn prefers_src_over_href() {
    let rewrite = autolinker()
      .autolink_tag("script", &[("href", "ctx:/a.js"), ("src", "ctx:/res/b.js")])
      .unwrap()
      .unwrap();
    assert_eq!(rewrite.attribute, "src");
    assert_eq!(rewrite.url, "../res/b.js");
  }

  #[test]
  fn ignores_tags_without_registered_prefix() {
    let autolinker = autolinker();
    assert!(!autolinker.is_autolink_candidate(&[("src", "images/a.png")]));
    assert!(autolinker.is_autolink_candidate(&[("href", "ctx:/res/test.css")]));
    assert!(
      autolinker
        .autolink_tag("img", &[("src", "images/a.png")])
        .unwrap()
        .is_none()
    );
    assert!(autolinker.autolink_tag("div", &[]).unwrap().is_none());
  }

  #[test]
  fn surfaces_protected_path_errors() {
    let err = autolinker()
      .autolink_tag("a", &[("href", "ctx:/WEB-INF/web.xml")])
      .unwrap_err();
    assert!(matches!(err, AutolinkError::InvalidPath { .. }));
  }
}
