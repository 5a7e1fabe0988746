//! Key-value storage abstraction
//!
//! The origin-scoped, synchronous string storage the engine persists carts
//! and transient checkout state into. Consumers plug in whatever backs it
//! (an embedded file store, a WebView bridge); tests use [`MemoryStore`].

mod memory;

pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{AppError, AppResult};

/// Synchronous string key-value storage
///
/// The contract mirrors browser-origin storage: get/set/remove by string
/// key, no transactions, single logical writer per key. Implementations
/// must surface capacity overflow from `set` instead of failing silently.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key is absent
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, creating or replacing the key
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete a key; absent keys are a no-op
    fn remove(&self, key: &str);
}

/// Read and deserialize a JSON value from storage
///
/// An absent key yields `Ok(None)`. A present but corrupt value is logged
/// and also yields `Ok(None)`; stored state is advisory, never fatal.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> AppResult<Option<T>> {
    let Some(raw) = store.get(key) else {
        tracing::debug!(key, "storage key absent, nothing to do");
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            tracing::warn!(key, %err, "discarding corrupt storage value");
            Ok(None)
        }
    }
}

/// Serialize and write a JSON value to storage
pub fn write_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> AppResult<()> {
    let raw = serde_json::to_string(value).map_err(AppError::from)?;
    store.set(key, &raw)
}
