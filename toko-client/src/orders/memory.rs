//! In-memory document store

use super::{ChangeAction, DocumentEvent, DocumentStore};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// Process-local [`DocumentStore`] backed by nested concurrent maps
///
/// One broadcast channel per collection; events are droppable (lagging
/// subscribers miss them), matching the fire-and-forget semantics of the
/// hosted store's snapshot listeners.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: DashMap<String, DashMap<String, Value>>,
    channels: DashMap<String, broadcast::Sender<DocumentEvent>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, collection: &str) -> broadcast::Sender<DocumentEvent> {
        self.channels
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    fn publish(&self, collection: &str, id: &str, action: ChangeAction, data: Option<Value>) {
        let event = DocumentEvent {
            collection: collection.to_string(),
            id: id.to_string(),
            action,
            data,
        };
        // no subscribers is fine
        let _ = self.channel(collection).send(event);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create(&self, collection: &str, id: &str, record: Value) -> AppResult<()> {
        let records = self
            .collections
            .entry(collection.to_string())
            .or_default();
        if records.contains_key(id) {
            return Err(AppError::new(ErrorCode::AlreadyExists)
                .with_detail("collection", collection)
                .with_detail("id", id));
        }
        records.insert(id.to_string(), record.clone());
        drop(records);

        self.publish(collection, id, ChangeAction::Created, Some(record));
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|records| records.get(id).map(|record| record.value().clone())))
    }

    async fn query(&self, collection: &str, field: &str, value: &Value) -> AppResult<Vec<Value>> {
        let Some(records) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(records
            .iter()
            .filter(|record| record.value().get(field) == Some(value))
            .map(|record| record.value().clone())
            .collect())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> AppResult<()> {
        let records = self.collections.get(collection).ok_or_else(|| {
            AppError::not_found(format!("collection {}", collection))
        })?;
        let mut record = records
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("record {}", id)))?;

        if let (Value::Object(target), Value::Object(fields)) = (record.value_mut(), patch) {
            for (key, value) in fields {
                target.insert(key, value);
            }
        } else {
            return Err(AppError::invalid_request("update patch must be an object"));
        }

        let updated = record.value().clone();
        drop(record);
        drop(records);

        self.publish(collection, id, ChangeAction::Updated, Some(updated));
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let removed = self
            .collections
            .get(collection)
            .and_then(|records| records.remove(id));
        if removed.is_some() {
            self.publish(collection, id, ChangeAction::Deleted, None);
        }
        Ok(())
    }

    fn subscribe(&self, collection: &str) -> broadcast::Receiver<DocumentEvent> {
        self.channel(collection).subscribe()
    }
}
