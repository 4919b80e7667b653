//! Rewriting of `url(...)` references inside stylesheet text.
//!
//! Stylesheets are never parsed. [`scan_url_tokens`] finds `url(...)` occurrences with a regular
//! expression and [`CssRewriter`] replaces each of them in a single left-to-right pass, leaving
//! every byte outside the matched tokens untouched.

mod rewriter;
mod tokens;

pub use rewriter::CssRewriter;
pub use tokens::{CssUrlToken, scan_url_tokens};
