use std::borrow::Cow;

use tracing::debug;

use crate::css::{CssUrlToken, scan_url_tokens};
use crate::error::{AutolinkError, Result};
use crate::paths::{ReferenceClass, classify_reference, resolve_relative};
use crate::resolver::{ResolverRegistry, ResourceLocator, ScopeAnchor};
use crate::services::{CssCompressor, ImageEncoder, UrlRenderer};

/// Rewrites the `url(...)` references of a stylesheet against a resolver registry.
pub struct CssRewriter<'a> {
  registry: &'a ResolverRegistry,
  renderer: &'a dyn UrlRenderer,
  encoder: &'a dyn ImageEncoder,
  compressor: Option<&'a dyn CssCompressor>,
}

impl<'a> CssRewriter<'a> {
  /// Rewriter resolving prefixed references through `registry`.
  pub fn new(
    registry: &'a ResolverRegistry,
    renderer: &'a dyn UrlRenderer,
    encoder: &'a dyn ImageEncoder,
  ) -> Self {
    Self {
      registry,
      renderer,
      encoder,
      compressor: None,
    }
  }

  /// Run `compressor` over the whole text before scanning it.
  pub fn with_compressor(mut self, compressor: Option<&'a dyn CssCompressor>) -> Self {
    self.compressor = compressor;
    self
  }

  /// Rewrite every `url(...)` token of `css`.
  ///
  /// `scope` is the classpath anchor of the stylesheet, `None` for context stylesheets, and
  /// `location` is the path of the stylesheet relative to that scope. References with a
  /// registered prefix always resolve. Without a scope nothing else can be resolved and the
  /// remaining tokens are kept as they are. With a scope, data URIs, full URLs and
  /// context-absolute paths are kept while relative paths are resolved against `location`.
  ///
  /// Any failure aborts the whole rewrite; there is no partially rewritten output.
  pub fn rewrite(&self, css: &str, scope: Option<&ScopeAnchor>, location: &str) -> Result<String> {
    let input = match self.compressor {
      Some(compressor) => Cow::Owned(compressor.compress(css)),
      None => Cow::Borrowed(css),
    };

    let mut output = String::with_capacity(input.len());
    let mut last_end = 0;

    for token in scan_url_tokens(&input) {
      let span = token.span();
      output.push_str(&input[last_end..span.start]);
      match self.replacement(&token, scope, location)? {
        Some(replacement) => {
          debug!(original = token.text(), %replacement, location, "rewrote css url");
          output.push_str(&replacement);
        }
        None => output.push_str(token.text()),
      }
      last_end = span.end;
    }

    output.push_str(&input[last_end..]);
    Ok(output)
  }

  fn replacement(
    &self,
    token: &CssUrlToken<'_>,
    scope: Option<&ScopeAnchor>,
    location: &str,
  ) -> Result<Option<String>> {
    let url = token.url();
    if let Some(resolver) = self.registry.lookup(url) {
      let locator = resolver.resolve(url)?;
      return self.quoted_url(&locator).map(Some);
    }

    let Some(scope) = scope else {
      return Ok(None);
    };
    if url.is_empty() {
      return Ok(None);
    }

    match classify_reference(url) {
      ReferenceClass::DataUri | ReferenceClass::Full | ReferenceClass::ContextAbsolute => Ok(None),
      ReferenceClass::Relative => {
        let resolved = resolve_relative(location, url);
        if resolved.embeds_base64() {
          let image = resolved.without_embed_marker();
          let locator = ResourceLocator::package(scope.clone(), image.to_string());
          let data_uri = self.encoder.encode(&locator).map_err(|err| {
            AutolinkError::unresolved(format!("{}/{}", scope.name(), image), err)
          })?;
          Ok(Some(format!("url({data_uri})")))
        } else {
          let locator = ResourceLocator::package(scope.clone(), resolved.to_string());
          self.quoted_url(&locator).map(Some)
        }
      }
    }
  }

  fn quoted_url(&self, locator: &ResourceLocator) -> Result<String> {
    let url = self.renderer.url_for(locator)?;
    Ok(format!("url('{url}')"))
  }
}
