use regex::Regex;

/// How a `url(...)` value that carries no registered prefix should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceClass {
  /// Inline `data:` URI.
  DataUri,
  /// Absolute URL with a scheme or a network-path (`//host/...`) reference.
  Full,
  /// Absolute path on the application server (`/img/x.png`).
  ContextAbsolute,
  /// Path relative to the stylesheet that contains it.
  Relative,
}

fn data_uri_pattern() -> &'static Regex {
  use std::sync::OnceLock;

  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"(?i)^data:").expect("invalid data URI regex"))
}

fn full_url_patterns() -> &'static [Regex] {
  use std::sync::OnceLock;

  static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
  PATTERNS
    .get_or_init(|| {
      vec![
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("invalid scheme regex"),
        Regex::new(r"^//").expect("invalid network-path regex"),
      ]
    })
    .as_slice()
}

/// Classify a stylesheet reference that did not match any registered prefix.
///
/// Data URIs are checked first, so `data:` values never reach relative resolution even though
/// they also look like a scheme.
pub fn classify_reference(value: &str) -> ReferenceClass {
  if data_uri_pattern().is_match(value) {
    ReferenceClass::DataUri
  } else if full_url_patterns()
    .iter()
    .any(|pattern| pattern.is_match(value))
  {
    ReferenceClass::Full
  } else if value.starts_with('/') {
    ReferenceClass::ContextAbsolute
  } else {
    ReferenceClass::Relative
  }
}
