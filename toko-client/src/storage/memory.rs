//! In-memory key-value store

use super::KeyValueStore;
use dashmap::DashMap;
use shared::error::{AppError, AppResult, ErrorCode};

/// Process-local [`KeyValueStore`] backed by a concurrent map
///
/// The default backing store for tests and headless runs. An optional
/// capacity ceiling (total bytes of keys + values) emulates the ~5MB
/// browser-origin quota; overflowing writes fail with
/// [`ErrorCode::StorageQuotaExceeded`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
    capacity: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a byte capacity ceiling
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: Some(capacity),
        }
    }

    /// Total bytes currently held (keys + values)
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.key().len() + entry.value().len())
            .sum()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        if let Some(capacity) = self.capacity {
            let replaced = self.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let incoming = key.len() + value.len();
            if self.used_bytes() - replaced + incoming > capacity {
                return Err(AppError::new(ErrorCode::StorageQuotaExceeded)
                    .with_detail("key", key)
                    .with_detail("capacity", capacity as i64));
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}
