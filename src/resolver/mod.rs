//! Prefix-scoped resolution of resource paths into locators.
//!
//! A path such as `cp:/icons/beer.png` or `myscope:/logo.svg` carries a prefix naming the scope
//! it lives in. The [`ResolverRegistry`] finds the [`Resolver`] owning that prefix, which strips
//! the prefix and produces a [`ResourceLocator`] rooted at its scope.

mod locator;
mod prefix;
mod registry;
mod variants;

pub use locator::{LocatorKind, ResourceLocator, ScopeAnchor};
pub use prefix::{CLASSPATH_ROOT_PREFIX, CONTEXT_ROOT_PREFIX, PREFIX_SEPARATOR, Prefix};
pub use registry::ResolverRegistry;
pub use variants::{PROTECTED_SEGMENT, Resolver};
