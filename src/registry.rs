//! Process-wide default store.
//!
//! [`load`] creates the shared store on first use and appends to it on every
//! later call, so all callers in the process see one accumulating tree. Code
//! that wants isolation (tests in particular) should build its own
//! [`ConfigStore`] instead.

use crate::error::ConfigResult;
use crate::store::ConfigStore;
use parking_lot::Mutex;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

static GLOBAL: Mutex<Option<Arc<ConfigStore>>> = parking_lot::const_mutex(None);

/// Load `source` into the process-wide store, creating the store if needed.
///
/// Every successful call returns the same instance. If creating the store
/// fails, no instance is installed and the next call tries again.
pub fn load(source: impl AsRef<Path>) -> ConfigResult<Arc<ConfigStore>> {
    let mut global = GLOBAL.lock();

    if let Some(store) = global.as_ref() {
        store.append(source)?;
        return Ok(Arc::clone(store));
    }

    let store = Arc::new(ConfigStore::open(source.as_ref())?);
    info!(source = %source.as_ref().display(), "initialized process-wide config store");
    *global = Some(Arc::clone(&store));
    Ok(store)
}

/// The process-wide store, if [`load`] has succeeded at least once.
pub fn current() -> Option<Arc<ConfigStore>> {
    GLOBAL.lock().clone()
}

/// Look up `key` in the process-wide store. `None` if there is no store yet
/// or the key does not resolve.
pub fn get(key: &str) -> Option<Value> {
    current().and_then(|store| store.get(key))
}

/// Drop the process-wide store and return it. Holders of the old `Arc` keep
/// a working store; the next [`load`] starts a fresh one.
pub fn reset() -> Option<Arc<ConfigStore>> {
    GLOBAL.lock().take()
}
