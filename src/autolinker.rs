//! Entry point tying the resolver registry to the rendering, loading and encoding collaborators.

use std::sync::Arc;

use tracing::debug;

use crate::css::CssRewriter;
use crate::error::{AutolinkError, Result};
use crate::resolver::{Resolver, ResolverRegistry, ResourceLocator, ScopeAnchor};
use crate::services::{
  Base64ImageEncoder, CssCompressor, ImageEncoder, MountedUrlRenderer, ResourceLoader, UrlRenderer,
};

/// Configured autolinker. Immutable once built, so it can be shared between requests.
pub struct Autolinker {
  registry: ResolverRegistry,
  loader: Arc<dyn ResourceLoader>,
  renderer: Box<dyn UrlRenderer>,
  encoder: Box<dyn ImageEncoder>,
  compressor: Option<Box<dyn CssCompressor>>,
}

/// Collects scopes and collaborators before the [`Autolinker`] is frozen.
pub struct AutolinkerBuilder {
  registry: ResolverRegistry,
  loader: Arc<dyn ResourceLoader>,
  renderer: Box<dyn UrlRenderer>,
  encoder: Option<Box<dyn ImageEncoder>>,
  compressor: Option<Box<dyn CssCompressor>>,
}

impl AutolinkerBuilder {
  /// Builder with the built-in `cp:/` and `ctx:/` scopes, loading resources through `loader`.
  pub fn new(loader: impl ResourceLoader + 'static) -> Self {
    Self {
      registry: ResolverRegistry::with_builtins(),
      loader: Arc::new(loader),
      renderer: Box::new(MountedUrlRenderer::default()),
      encoder: None,
      compressor: None,
    }
  }

  /// Add a classpath scope: paths starting with `prefix:/` resolve next to `anchor`.
  pub fn scope(mut self, anchor: ScopeAnchor, prefix: &str) -> Result<Self> {
    self.registry.register_scope(anchor, prefix)?;
    Ok(self)
  }

  /// Replace the URL renderer.
  pub fn renderer(mut self, renderer: impl UrlRenderer + 'static) -> Self {
    self.renderer = Box::new(renderer);
    self
  }

  /// Replace the image encoder used for `?embedBase64` references.
  pub fn encoder(mut self, encoder: impl ImageEncoder + 'static) -> Self {
    self.encoder = Some(Box::new(encoder));
    self
  }

  /// Minifier to run over stylesheets before their references are rewritten.
  pub fn compressor(mut self, compressor: impl CssCompressor + 'static) -> Self {
    self.compressor = Some(Box::new(compressor));
    self
  }

  /// Freeze the configuration.
  pub fn build(self) -> Autolinker {
    let encoder: Box<dyn ImageEncoder> = match self.encoder {
      Some(encoder) => encoder,
      None => Box::new(Base64ImageEncoder::new(Arc::clone(&self.loader))),
    };

    Autolinker {
      registry: self.registry,
      loader: self.loader,
      renderer: self.renderer,
      encoder,
      compressor: self.compressor,
    }
  }
}

impl Autolinker {
  /// Start configuring an autolinker that loads resources through `loader`.
  pub fn builder(loader: impl ResourceLoader + 'static) -> AutolinkerBuilder {
    AutolinkerBuilder::new(loader)
  }

  /// Registered resolvers.
  pub fn registry(&self) -> &ResolverRegistry {
    &self.registry
  }

  /// Resolver owning the prefix of `path`, if any.
  pub fn resolver_for(&self, path: &str) -> Option<&Resolver> {
    self.registry.lookup(path)
  }

  /// Resolve a prefixed path; `Ok(None)` when no registered prefix matches.
  pub fn resolve(&self, path: &str) -> Result<Option<ResourceLocator>> {
    self
      .resolver_for(path)
      .map(|resolver| resolver.resolve(path))
      .transpose()
  }

  /// Resolve a prefixed stylesheet path whose own references are rewritten on load.
  pub fn resolve_for_css(&self, path: &str) -> Result<Option<ResourceLocator>> {
    self
      .resolver_for(path)
      .map(|resolver| resolver.resolve_for_css(path))
      .transpose()
  }

  /// Servable URL of `locator`.
  pub fn url_for(&self, locator: &ResourceLocator) -> Result<String> {
    self.renderer.url_for(locator)
  }

  /// Rewrite the `url(...)` references of a stylesheet located at `location` within `scope`.
  pub fn rewrite_css(
    &self,
    css: &str,
    scope: Option<&ScopeAnchor>,
    location: &str,
  ) -> Result<String> {
    CssRewriter::new(&self.registry, self.renderer.as_ref(), self.encoder.as_ref())
      .with_compressor(self.compressor.as_deref())
      .rewrite(css, scope, location)
  }

  /// Load the body of `locator`.
  ///
  /// Stylesheet locators are piped through [`Autolinker::rewrite_css`]: the body is decoded as
  /// UTF-8, rewritten with the locator's scope (none for context resources) and its path as
  /// the document location, then encoded again.
  pub fn load(&self, locator: &ResourceLocator) -> Result<Vec<u8>> {
    let bytes = self.loader.load(locator)?;
    if !locator.is_css() {
      return Ok(bytes);
    }

    let css = String::from_utf8(bytes)
      .map_err(|_| AutolinkError::InvalidEncoding(locator.path().to_string()))?;
    debug!(path = locator.path(), "rewriting stylesheet on load");
    let rewritten = self.rewrite_css(&css, locator.scope(), locator.path())?;
    Ok(rewritten.into_bytes())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::BTreeMap;

  use crate::paths::normalize_segments;
  use crate::resolver::LocatorKind;

  #[derive(Default)]
  struct MemoryLoader {
    files: BTreeMap<(bool, String), Vec<u8>>,
  }

  impl MemoryLoader {
    fn context(mut self, path: &str, body: &[u8]) -> Self {
      self.files.insert((false, path.to_string()), body.to_vec());
      self
    }

    fn package(mut self, path: &str, body: &[u8]) -> Self {
      self.files.insert((true, path.to_string()), body.to_vec());
      self
    }
  }

  impl ResourceLoader for MemoryLoader {
    fn load(&self, locator: &ResourceLocator) -> Result<Vec<u8>> {
      let key = match locator.kind() {
        LocatorKind::Package(anchor) => (true, normalize_segments(&anchor.sibling(locator.path()))),
        LocatorKind::Context => (false, normalize_segments(locator.path())),
      };
      self
        .files
        .get(&key)
        .cloned()
        .ok_or_else(|| AutolinkError::ResourceNotFound(key.1))
    }
  }

  fn scope_anchor() -> ScopeAnchor {
    ScopeAnchor::new("com.example.res.Scope", "com/example/res")
  }

  #[test]
  fn resolves_only_registered_prefixes() {
    let autolinker = Autolinker::builder(MemoryLoader::default())
      .scope(scope_anchor(), "testscope")
      .unwrap()
      .build();

    assert!(autolinker.resolve("images/a.png").unwrap().is_none());
    let locator = autolinker.resolve("testscope:/test.png").unwrap().unwrap();
    assert_eq!(
      autolinker.url_for(&locator).unwrap(),
      "./wicket/resource/com.example.res.Scope/test.png"
    );
    assert!(autolinker.resolve("ctx:/WEB-INF/web.xml").is_err());
  }

  #[test]
  fn context_stylesheets_are_rewritten_without_scope() {
    let loader = MemoryLoader::default().context(
      "res/test.css",
      b".regular { background: url('test.png'); }\n.ctxroot { background: url('ctx:/res/test.png'); }",
    );
    let autolinker = Autolinker::builder(loader)
      .renderer(MountedUrlRenderer::new("../resource", "../.."))
      .build();

    let locator = autolinker.resolve_for_css("ctx:/res/test.css").unwrap().unwrap();
    let body = String::from_utf8(autolinker.load(&locator).unwrap()).unwrap();
    assert_eq!(
      body,
      ".regular { background: url('test.png'); }\n.ctxroot { background: url('../../res/test.png'); }"
    );
  }

  #[test]
  fn plain_context_resources_are_served_verbatim() {
    let loader = MemoryLoader::default().context("res/test.css", b"a { b: url('cp:/x.png') }");
    let autolinker = Autolinker::builder(loader).build();

    let locator = autolinker.resolve("ctx:/res/test.css").unwrap().unwrap();
    assert_eq!(autolinker.load(&locator).unwrap(), b"a { b: url('cp:/x.png') }");
  }

  #[test]
  fn classpath_stylesheets_resolve_relative_to_their_package() {
    let loader = MemoryLoader::default().package(
      "com/example/res/test.css",
      b".regular { background: url('./test.png'); }",
    );
    let autolinker = Autolinker::builder(loader).build();

    let locator = autolinker
      .resolve_for_css("cp:/com/example/res/test.css")
      .unwrap()
      .unwrap();
    let body = String::from_utf8(autolinker.load(&locator).unwrap()).unwrap();
    assert_eq!(
      body,
      ".regular { background: url('./wicket/resource/_cp._/::/com/example/res/test.png'); }"
    );
  }

  #[test]
  fn default_encoder_reads_through_the_loader() {
    let loader = MemoryLoader::default().package("com/example/res/img/dot.gif", b"GIF89a");
    let autolinker = Autolinker::builder(loader).build();

    let css = autolinker
      .rewrite_css(
        "a { b: url(../img/dot.gif?embedBase64) }",
        Some(&scope_anchor()),
        "css/site.css",
      )
      .unwrap();
    assert_eq!(css, "a { b: url(data:image/gif;base64,R0lGODlh) }");
  }

  #[test]
  fn rejects_non_utf8_stylesheets() {
    let loader = MemoryLoader::default().context("res/bad.css", &[0xff, 0xfe, 0x00]);
    let autolinker = Autolinker::builder(loader).build();

    let locator = autolinker.resolve_for_css("ctx:/res/bad.css").unwrap().unwrap();
    assert!(matches!(
      autolinker.load(&locator),
      Err(AutolinkError::InvalidEncoding(_))
    ));
  }

  #[test]
  fn compressor_runs_before_rewriting() {
    let autolinker = Autolinker::builder(MemoryLoader::default())
      .compressor(|css: &str| css.trim().to_string())
      .build();

    let css = autolinker
      .rewrite_css("  a { b: url(cp:/x.png) }  ", None, "ctx:/a.css")
      .unwrap();
    assert_eq!(css, "a { b: url('./wicket/resource/_cp._/::/x.png') }");
  }
}
