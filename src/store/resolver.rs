//! Dotted-path lookup with per-key memoization.
//!
//! The resolver owns the current tree snapshot and the key cache together so
//! that replacing the tree and clearing the cache happen as one step: a lookup
//! can never cache a value read from a tree that has already been replaced.

use super::ConfigTree;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Resolved lookups keyed by the literal key string. `None` records a miss.
type KeyCache = HashMap<String, Option<Value>>;

pub struct PathResolver {
    tree: ArcSwap<ConfigTree>,
    cache: Mutex<KeyCache>,
}

impl PathResolver {
    pub fn new(tree: ConfigTree) -> Self {
        Self {
            tree: ArcSwap::from_pointee(tree),
            cache: Mutex::new(KeyCache::new()),
        }
    }

    /// The current tree. Later merges do not affect a snapshot already taken.
    pub fn snapshot(&self) -> Arc<ConfigTree> {
        self.tree.load_full()
    }

    /// Resolve `key` (non-empty), consulting the cache first.
    pub fn resolve(&self, key: &str) -> Option<Value> {
        let mut cache = self.cache.lock();
        if let Some(cached) = cache.get(key) {
            trace!(key, hit = cached.is_some(), "config key cache hit");
            return cached.clone();
        }

        let tree = self.tree.load();
        let found = lookup(&tree, key).cloned();
        trace!(key, found = found.is_some(), "config key resolved");
        cache.insert(key.to_string(), found.clone());
        found
    }

    /// Install a new tree and drop every cached lookup.
    pub fn replace(&self, tree: ConfigTree) {
        let mut cache = self.cache.lock();
        self.tree.store(Arc::new(tree));
        cache.clear();
    }

    /// Number of keys currently memoized.
    pub fn cached_keys(&self) -> usize {
        self.cache.lock().len()
    }
}

/// Walk `tree` along the `.`-separated segments of `key`.
///
/// Every segment but the last must land on a mapping; running into a scalar
/// or sequence with segments left over is a miss, not an error.
pub fn lookup<'a>(tree: &'a ConfigTree, key: &str) -> Option<&'a Value> {
    let mut segments = key.split('.');
    let mut current = tree.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: Value) -> ConfigTree {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_lookup_nested() {
        let t = tree(json!({"a": {"b": {"c": 42}}}));
        assert_eq!(lookup(&t, "a.b.c"), Some(&json!(42)));
        assert_eq!(lookup(&t, "a.b"), Some(&json!({"c": 42})));
        assert_eq!(lookup(&t, "a.b.x"), None);
    }

    #[test]
    fn test_lookup_through_scalar_is_miss() {
        let t = tree(json!({"a": {"b": {"c": 42}}, "list": [1, 2]}));
        assert_eq!(lookup(&t, "a.b.c.d"), None);
        assert_eq!(lookup(&t, "list.0"), None);
    }

    #[test]
    fn test_lookup_keeps_null_values() {
        let t = tree(json!({"a": null}));
        assert_eq!(lookup(&t, "a"), Some(&Value::Null));
    }

    #[test]
    fn test_resolve_caches_hits_and_misses() {
        let resolver = PathResolver::new(tree(json!({"a": {"b": 1}})));
        assert_eq!(resolver.resolve("a.b"), Some(json!(1)));
        assert_eq!(resolver.resolve("a.z"), None);
        assert_eq!(resolver.cached_keys(), 2);

        // Repeated lookups are served from the cache
        assert_eq!(resolver.resolve("a.b"), Some(json!(1)));
        assert_eq!(resolver.cached_keys(), 2);
    }

    #[test]
    fn test_replace_clears_cache() {
        let resolver = PathResolver::new(tree(json!({"a": {"b": {"c": 42}}})));
        assert_eq!(resolver.resolve("a.b.c"), Some(json!(42)));

        resolver.replace(tree(json!({"a": {"b": {"c": 99}}})));
        assert_eq!(resolver.cached_keys(), 0);
        assert_eq!(resolver.resolve("a.b.c"), Some(json!(99)));
    }

    #[test]
    fn test_snapshot_is_stable_across_replace() {
        let resolver = PathResolver::new(tree(json!({"v": 1})));
        let before = resolver.snapshot();
        resolver.replace(tree(json!({"v": 2})));
        assert_eq!(before["v"], json!(1));
        assert_eq!(resolver.snapshot()["v"], json!(2));
    }
}
