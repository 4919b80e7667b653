#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod autolinker;
pub mod config;
pub mod css;
pub mod error;
pub mod markup;
pub mod paths;
pub mod resolver;
pub mod services;

pub use autolinker::{Autolinker, AutolinkerBuilder};
pub use config::AutolinkConfig;
pub use css::CssRewriter;
pub use error::{AutolinkError, Result};
pub use markup::TagRewrite;
pub use resolver::{Prefix, Resolver, ResolverRegistry, ResourceLocator, ScopeAnchor};
