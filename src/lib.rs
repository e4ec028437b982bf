//! cfgstack: a read-only, in-process configuration aggregator.
//!
//! Configuration files of different formats (TOML, JSON, XML, INI, and
//! optionally YAML) are merged in load order into one tree, which is queried
//! with dotted-path keys such as `"db.host"`.
//!
//! ```no_run
//! use cfgstack::ConfigStore;
//!
//! let store = ConfigStore::new();
//! store.append("config/base.toml")?.append("config/local.ini")?;
//! let host = store.get("db.host");
//! # Ok::<(), cfgstack::ConfigError>(())
//! ```
//!
//! For ambient access across a program, [`registry::load`] maintains one
//! process-wide store.

pub mod adapters;
pub mod error;
pub mod logging;
pub mod paths;
pub mod registry;
pub mod store;

pub use adapters::{FormatAdapter, FormatRegistry};
pub use error::{ConfigError, ConfigResult, ErrorCode};
pub use store::{ConfigStore, ConfigTree, MergeStrategy, SourceRecord, StoreOptions};
