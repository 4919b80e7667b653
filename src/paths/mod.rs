//! Helpers for classifying, normalising and relativising resource paths.
//!
//! The logic is split into focused submodules so that reference classification, dot-segment
//! normalisation and stylesheet-relative resolution can be tested independently. Resolvers,
//! the filesystem loader and the CSS rewriter all share these helpers.

mod filters;
mod normalize;
mod relative;

pub use filters::{ReferenceClass, classify_reference};
pub use normalize::{escapes_root, normalize_segments};
pub use relative::{EMBED_BASE64, ResolvedReference, resolve_relative};
