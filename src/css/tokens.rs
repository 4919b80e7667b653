use std::ops::Range;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::paths::EMBED_BASE64;

fn url_token_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"url\(\s*['"]?(\S*?)['"]?\s*\)"#).expect("invalid url() token regex")
  })
}

/// One `url(...)` occurrence in stylesheet text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssUrlToken<'a> {
  span: Range<usize>,
  text: &'a str,
  url: &'a str,
}

impl<'a> CssUrlToken<'a> {
  fn from_captures(captures: &Captures<'a>) -> Option<Self> {
    let whole = captures.get(0)?;
    let url = captures.get(1)?;
    Some(Self {
      span: whole.range(),
      text: whole.as_str(),
      url: url.as_str(),
    })
  }

  /// Byte range of the whole token in the scanned text.
  pub fn span(&self) -> Range<usize> {
    self.span.clone()
  }

  /// The token exactly as it appears in the source.
  pub fn text(&self) -> &'a str {
    self.text
  }

  /// Referenced URL with surrounding quotes and whitespace removed.
  pub fn url(&self) -> &'a str {
    self.url
  }

  /// Whether the reference asks to be inlined as a base64 data URI.
  pub fn requests_embedding(&self) -> bool {
    self
      .url
      .split_once('?')
      .is_some_and(|(_, query)| {
        query
          .split('&')
          .any(|parameter| parameter.split('=').next() == Some(EMBED_BASE64))
      })
  }
}

/// Iterate over the `url(...)` tokens of `css` in source order.
pub fn scan_url_tokens(css: &str) -> impl Iterator<Item = CssUrlToken<'_>> {
  url_token_pattern()
    .captures_iter(css)
    .filter_map(|captures| CssUrlToken::from_captures(&captures))
}
