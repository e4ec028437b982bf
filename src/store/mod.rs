//! The configuration store: merged tree, loaded-source tracking and lookup.
//!
//! ## Merge semantics
//! Sources are merged in the order they are appended. With the default
//! [`MergeStrategy::Overlay`] every top-level key of a newly loaded source
//! replaces the key of the same name wholesale, so for
//! `A = {db: {host: "a", port: 1}}` followed by `B = {db: {host: "b"}}` the
//! result is `{db: {host: "b"}}`. Recursive merging is opt-in through
//! [`StoreOptions::merge_strategy`].
//!
//! ## Sources
//! A file source is merged at most once; appending it again is a no-op.
//! Literal data passed to [`ConfigStore::append_data`] is not tracked and is
//! merged every time.
//!
//! ## Concurrency
//! A store can be shared across threads. Merges are serialized by a writer
//! lock; lookups read an immutable tree snapshot.

mod merge;
mod resolver;

pub use merge::{MergeStrategy, deep_merge, overlay};
pub use resolver::{PathResolver, lookup};

use crate::adapters::FormatRegistry;
use crate::error::{ConfigError, ConfigResult};
use crate::paths;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// A mapping from string keys to configuration values.
pub type ConfigTree = Map<String, Value>;

/// A file that has been merged into a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    /// Normalized path the source was loaded from (see [`paths::source_id`]).
    pub path: PathBuf,
    /// Name of the adapter that parsed it.
    pub format: &'static str,
}

/// Construction options for a [`ConfigStore`].
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    merge_strategy: MergeStrategy,
    formats: FormatRegistry,
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = strategy;
        self
    }

    /// Replace the set of recognized formats.
    pub fn formats(mut self, formats: FormatRegistry) -> Self {
        self.formats = formats;
        self
    }
}

/// Accumulates configuration from files and literal data, and answers
/// dotted-path lookups against the merged result.
pub struct ConfigStore {
    resolver: PathResolver,
    /// Loaded sources in load order. Held for the whole of every merge.
    sources: Mutex<Vec<SourceRecord>>,
    strategy: MergeStrategy,
    formats: Arc<FormatRegistry>,
}

impl ConfigStore {
    /// An empty store with the default formats and overlay merging.
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            resolver: PathResolver::new(ConfigTree::new()),
            sources: Mutex::new(Vec::new()),
            strategy: options.merge_strategy,
            formats: Arc::new(options.formats),
        }
    }

    /// A new store with `path` loaded as its first source.
    pub fn open(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> ConfigResult<Self> {
        let store = Self::with_options(options);
        store.append(path)?;
        Ok(store)
    }

    /// A new store holding `data`.
    pub fn from_data(data: ConfigTree) -> Self {
        Self::from_data_with(data, StoreOptions::default())
    }

    pub fn from_data_with(data: ConfigTree, options: StoreOptions) -> Self {
        let store = Self::with_options(options);
        store.append_data(data);
        store
    }

    /// Load the file at `path` and merge it into the tree.
    ///
    /// A path that is already loaded is skipped. On error nothing changes:
    /// the tree is untouched and the path is not recorded, so the same path
    /// can be appended again once the file is fixed.
    ///
    /// Returns `&self` so calls can be chained:
    /// `store.append("base.toml")?.append("local.ini")?`.
    pub fn append(&self, path: impl AsRef<Path>) -> ConfigResult<&Self> {
        // Open the path as given; the lexical id is only for dedup
        let path = paths::expand_home(path.as_ref());
        let id = paths::source_id(&path);
        let mut sources = self.sources.lock();

        if sources.iter().any(|record| record.path == id) {
            debug!(path = %id.display(), "config source already loaded, skipping");
            return Ok(self);
        }

        let (format, data) = self.read_source(&path).inspect_err(|e| {
            warn!(path = %path.display(), code = %e.code(), "failed to load config source: {e}");
        })?;

        let keys = data.len();
        debug!(path = %id.display(), format, keys, "merged config source");
        sources.push(SourceRecord { path: id, format });
        self.merge(data);

        Ok(self)
    }

    /// Merge literal data into the tree. Always merges, even if identical
    /// data was appended before.
    pub fn append_data(&self, data: ConfigTree) -> &Self {
        let _writer = self.sources.lock();
        let keys = data.len();
        self.merge(data);
        debug!(keys, "merged literal config data");
        self
    }

    /// Look up a dotted-path key such as `"db.host"`.
    ///
    /// `None` or an empty key returns the whole tree. A key that does not
    /// resolve, including one that indexes into a scalar, returns `None`.
    pub fn get<'k>(&self, key: impl Into<Option<&'k str>>) -> Option<Value> {
        match key.into() {
            None | Some("") => Some(Value::Object((*self.tree()).clone())),
            Some(key) => self.resolver.resolve(key),
        }
    }

    /// Like [`get`](Self::get), falling back to `default` when the key does
    /// not resolve.
    pub fn get_or<'k>(&self, key: impl Into<Option<&'k str>>, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    pub fn contains(&self, key: &str) -> bool {
        key.is_empty() || self.resolver.resolve(key).is_some()
    }

    /// Read-only snapshot of the merged tree.
    pub fn tree(&self) -> Arc<ConfigTree> {
        self.resolver.snapshot()
    }

    /// Loaded sources, in load order.
    pub fn sources(&self) -> Vec<SourceRecord> {
        self.sources.lock().clone()
    }

    pub fn is_loaded(&self, path: impl AsRef<Path>) -> bool {
        let path = paths::source_id(path.as_ref());
        self.sources.lock().iter().any(|record| record.path == path)
    }

    pub fn merge_strategy(&self) -> MergeStrategy {
        self.strategy
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    /// Number of memoized lookups. Drops to zero after every merge.
    pub fn cached_keys(&self) -> usize {
        self.resolver.cached_keys()
    }

    /// Caller must hold the `sources` lock.
    fn merge(&self, data: ConfigTree) {
        let mut next = (*self.resolver.snapshot()).clone();
        self.strategy.apply(&mut next, data);
        self.resolver.replace(next);
    }

    fn read_source(&self, path: &Path) -> ConfigResult<(&'static str, ConfigTree)> {
        let metadata = fs::metadata(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;
        if !metadata.is_file() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let mut file = File::open(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let adapter = self.formats.resolve(path)?;

        let mut content = String::new();
        file.read_to_string(&mut content).map_err(|source| match source.kind() {
            ErrorKind::InvalidData => ConfigError::Parse {
                path: path.to_path_buf(),
                format: adapter.name(),
                source: Box::new(source),
            },
            _ => ConfigError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let data = adapter
            .parse(path, &content)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                format: adapter.name(),
                source,
            })?;

        Ok((adapter.name(), data))
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("sources", &self.sources())
            .field("strategy", &self.strategy)
            .field("formats", &self.formats)
            .field("keys", &self.tree().len())
            .finish()
    }
}
