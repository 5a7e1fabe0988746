//! Order persistence against the hosted document store
//!
//! The document store is consumed as an opaque collaborator with
//! collection-scoped CRUD and a change subscription. Orders are owned by
//! the store once submitted; the client reads them back and requests
//! status transitions.

mod memory;

pub use memory::MemoryDocumentStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderStatus};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Collection holding checkout snapshots
pub const ORDERS_COLLECTION: &str = "orders";

/// Change action carried by a [`DocumentEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

/// Real-time change notification from the document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEvent {
    pub collection: String,
    pub id: String,
    pub action: ChangeAction,
    /// Record data; `None` for deletions
    pub data: Option<Value>,
}

/// Hosted document database contract
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a record; fails if the id already exists in the collection
    async fn create(&self, collection: &str, id: &str, record: Value) -> AppResult<()>;

    /// Read a record; `None` when absent
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    /// All records whose top-level `field` equals `value`
    async fn query(&self, collection: &str, field: &str, value: &Value) -> AppResult<Vec<Value>>;

    /// Merge the given top-level fields into an existing record
    async fn update(&self, collection: &str, id: &str, patch: Value) -> AppResult<()>;

    /// Delete a record; absent ids are a no-op
    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;

    /// Subscribe to changes within a collection
    fn subscribe(&self, collection: &str) -> broadcast::Receiver<DocumentEvent>;
}

/// Order submission and lifecycle
#[derive(Clone)]
pub struct OrdersService {
    store: Arc<dyn DocumentStore>,
}

impl OrdersService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Hand a checkout snapshot to the document store
    pub async fn submit(&self, order: &Order) -> AppResult<()> {
        let record = serde_json::to_value(order).map_err(AppError::from)?;
        self.store.create(ORDERS_COLLECTION, &order.id, record).await?;
        tracing::info!(order_id = %order.id, total = order.payment.total, "order submitted");
        Ok(())
    }

    /// Load one order
    pub async fn order(&self, order_id: &str) -> AppResult<Order> {
        let record = self
            .store
            .get(ORDERS_COLLECTION, order_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id)
            })?;
        serde_json::from_value(record).map_err(AppError::from)
    }

    /// All orders belonging to a user, newest first
    pub async fn orders_for_user(&self, user_id: &str) -> AppResult<Vec<Order>> {
        let records = self
            .store
            .query(ORDERS_COLLECTION, "user_id", &Value::String(user_id.to_string()))
            .await?;
        let mut orders: Vec<Order> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value(record) {
                Ok(order) => Some(order),
                Err(err) => {
                    tracing::warn!(%err, "skipping unreadable order record");
                    None
                }
            })
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Apply a status transition and persist it
    pub async fn transition(&self, order_id: &str, next: OrderStatus) -> AppResult<Order> {
        let mut order = self.order(order_id).await?;
        order.transition_to(next)?;

        let patch = serde_json::json!({
            "status": order.status,
            "updated_at": order.updated_at,
        });
        self.store.update(ORDERS_COLLECTION, order_id, patch).await?;
        tracing::info!(order_id, status = ?order.status, "order status changed");
        Ok(order)
    }

    /// Record a received bank transfer
    pub async fn mark_paid(&self, order_id: &str) -> AppResult<Order> {
        self.transition(order_id, OrderStatus::Paid).await
    }

    /// Void a pending order
    pub async fn cancel(&self, order_id: &str) -> AppResult<Order> {
        self.transition(order_id, OrderStatus::Cancelled).await
    }

    /// Close out a paid order
    pub async fn complete(&self, order_id: &str) -> AppResult<Order> {
        self.transition(order_id, OrderStatus::Completed).await
    }

    /// Subscribe to order record changes
    pub fn subscribe(&self) -> broadcast::Receiver<DocumentEvent> {
        self.store.subscribe(ORDERS_COLLECTION)
    }
}
