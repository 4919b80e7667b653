use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{AutolinkError, Result};
use crate::resolver::{CLASSPATH_ROOT_PREFIX, CONTEXT_ROOT_PREFIX, Prefix, Resolver, ScopeAnchor};

/// Mapping from prefix to resolver.
///
/// The registry is filled while the application is configured and only read afterwards.
/// Registration must be complete before the first concurrent lookup; [`crate::Autolinker`]
/// enforces this by taking the registry by value once it is built.
#[derive(Debug, Clone, Default)]
pub struct ResolverRegistry {
  resolvers: BTreeMap<Prefix, Resolver>,
}

impl ResolverRegistry {
  /// Empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Registry holding the built-in `cp:/` and `ctx:/` resolvers.
  pub fn with_builtins() -> Self {
    let mut resolvers = BTreeMap::new();
    for resolver in [Resolver::classpath_root(), Resolver::context_root()] {
      resolvers.insert(resolver.prefix().clone(), resolver);
    }
    Self { resolvers }
  }

  /// Store `resolver` under its prefix.
  ///
  /// Registering the same prefix again replaces the earlier resolver, which is returned.
  /// A prefix that would also match the paths of another registered prefix is rejected.
  pub fn register(&mut self, resolver: Resolver) -> Result<Option<Resolver>> {
    let prefix = resolver.prefix().clone();
    if let Some(existing) = self.resolvers.keys().find(|existing| existing.overlaps(&prefix)) {
      return Err(AutolinkError::AmbiguousPrefix {
        prefix: prefix.to_string(),
        existing: existing.to_string(),
      });
    }

    let previous = self.resolvers.insert(prefix.clone(), resolver);
    if previous.is_some() {
      warn!(%prefix, "scope prefix registered twice, keeping the latest resolver");
    }
    Ok(previous)
  }

  /// Register a classpath scope rooted at `anchor` under the prefix token `prefix`.
  ///
  /// The built-in `cp` and `ctx` prefixes cannot be taken over.
  pub fn register_scope(&mut self, anchor: ScopeAnchor, prefix: &str) -> Result<()> {
    let resolver = Resolver::classpath_scope(anchor, prefix)?;
    let token = resolver.prefix().token();
    if token == CLASSPATH_ROOT_PREFIX || token == CONTEXT_ROOT_PREFIX {
      return Err(AutolinkError::ReservedPrefix(token.to_string()));
    }

    self.register(resolver)?;
    Ok(())
  }

  /// Resolver whose prefix starts `candidate`, preferring the longest matching prefix.
  pub fn lookup(&self, candidate: &str) -> Option<&Resolver> {
    if candidate.is_empty() {
      return None;
    }

    self
      .resolvers
      .iter()
      .filter(|(prefix, _)| prefix.matches(candidate))
      .max_by_key(|(prefix, _)| prefix.as_str().len())
      .map(|(_, resolver)| resolver)
  }

  /// Resolver registered for a prefix token such as `cp` or `myscope`.
  pub fn get(&self, token: &str) -> Option<&Resolver> {
    let prefix = Prefix::new(token).ok()?;
    self.resolvers.get(&prefix)
  }

  /// Registered resolvers ordered by prefix.
  pub fn iter(&self) -> impl Iterator<Item = &Resolver> {
    self.resolvers.values()
  }

  /// Number of registered prefixes.
  pub fn len(&self) -> usize {
    self.resolvers.len()
  }

  /// Returns `true` when nothing is registered.
  pub fn is_empty(&self) -> bool {
    self.resolvers.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn anchor() -> ScopeAnchor {
    ScopeAnchor::new("com.example.res.Scope", "com/example/res")
  }

  #[test]
  fn builtins_resolve_their_prefixes() {
    let registry = ResolverRegistry::with_builtins();
    assert_eq!(registry.len(), 2);
    assert!(matches!(
      registry.lookup("cp:/a/b.png"),
      Some(Resolver::ClasspathRoot { .. })
    ));
    assert!(matches!(
      registry.lookup("ctx:/res/test.css"),
      Some(Resolver::ContextRoot { .. })
    ));
  }

  #[test]
  fn lookup_ignores_empty_and_unprefixed_paths() {
    let registry = ResolverRegistry::with_builtins();
    assert!(registry.lookup("").is_none());
    assert!(registry.lookup("images/a.png").is_none());
    assert!(registry.lookup("cp:a.png").is_none());
    assert!(registry.lookup("CP:/a.png").is_none());
  }

  #[test]
  fn registers_custom_scopes() {
    let mut registry = ResolverRegistry::with_builtins();
    registry.register_scope(anchor(), "testscope").unwrap();

    let resolver = registry.lookup("testscope:/test.png").unwrap();
    assert_eq!(resolver.prefix().as_str(), "testscope:/");
    assert!(registry.get("testscope").is_some());
  }

  #[test]
  fn latest_registration_wins() {
    let mut registry = ResolverRegistry::new();
    registry.register_scope(anchor(), "sc").unwrap();
    let other = ScopeAnchor::new("com.example.Other", "com/example");
    registry.register_scope(other.clone(), "sc:/").unwrap();

    assert_eq!(registry.len(), 1);
    let locator = registry.lookup("sc:/x.png").unwrap().resolve("sc:/x.png").unwrap();
    assert_eq!(locator.scope(), Some(&other));
  }

  #[test]
  fn rejects_builtin_prefixes_for_custom_scopes() {
    let mut registry = ResolverRegistry::with_builtins();
    assert!(matches!(
      registry.register_scope(anchor(), "cp"),
      Err(AutolinkError::ReservedPrefix(_))
    ));
    assert!(matches!(
      registry.register_scope(anchor(), "ctx:/"),
      Err(AutolinkError::ReservedPrefix(_))
    ));
  }

  #[test]
  fn rejects_overlapping_prefixes() {
    let mut registry = ResolverRegistry::with_builtins();
    let err = registry.register_scope(anchor(), "cp:/com").unwrap_err();
    assert!(matches!(err, AutolinkError::AmbiguousPrefix { .. }));
    assert_eq!(registry.len(), 2);
  }
}
