//! Cart Service - per-identity cart slots with write-through persistence
//!
//! Exactly one cart is authoritative per identity: the guest slot before
//! sign-in, the user slot after. Every mutation is persisted to the owner's
//! storage slot before it returns, and an updated [`CartSummary`] is
//! published on a watch channel for whatever renders the item-count badge.

use crate::config::ClientConfig;
use crate::storage::{self, KeyValueStore};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::error::AppResult;
use shared::models::{Cart, Product, merge_carts};
use std::sync::Arc;
use tokio::sync::watch;

/// The identity a cart slot belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CartOwner {
    #[default]
    Guest,
    User(String),
}

impl CartOwner {
    /// Storage key for this owner's cart slot
    pub fn storage_key(&self, namespace: &str) -> String {
        match self {
            CartOwner::Guest => format!("{}:cart:guest", namespace),
            CartOwner::User(uid) => format!("{}:cart:user:{}", namespace, uid),
        }
    }
}

/// Aggregates published after every cart mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSummary {
    pub total_items: i64,
    pub total_price: i64,
}

impl CartSummary {
    fn of(cart: &Cart) -> Self {
        Self {
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }
}

/// Cart persistence and consolidation
///
/// Writes are serialized per service instance; concurrent writers from
/// another process remain last-write-wins, as with any origin storage.
pub struct CartService {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
    owner: RwLock<CartOwner>,
    summary_tx: watch::Sender<CartSummary>,
}

impl CartService {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &ClientConfig) -> Self {
        let (summary_tx, _) = watch::channel(CartSummary::default());
        let service = Self {
            store,
            namespace: config.storage_namespace.clone(),
            owner: RwLock::new(CartOwner::Guest),
            summary_tx,
        };
        service.publish(&service.cart());
        service
    }

    /// The identity currently owning the active cart slot
    pub fn owner(&self) -> CartOwner {
        self.owner.read().clone()
    }

    /// Switch the active cart slot
    ///
    /// Does not move any data; consolidation is [`Self::merge_guest_into`].
    pub fn set_owner(&self, owner: CartOwner) {
        *self.owner.write() = owner;
        self.publish(&self.cart());
    }

    /// Subscribe to item-count/total updates
    pub fn subscribe_summary(&self) -> watch::Receiver<CartSummary> {
        self.summary_tx.subscribe()
    }

    /// Load the active cart; an absent or corrupt slot yields an empty cart
    pub fn cart(&self) -> Cart {
        let key = self.owner.read().storage_key(&self.namespace);
        storage::read_json(self.store.as_ref(), &key)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Add a product to the active cart
    pub fn add_item(&self, product: &Product, quantity: i64) -> AppResult<Cart> {
        self.mutate(|cart| cart.add_item(product, quantity))
    }

    /// Remove a product from the active cart (absent id is a no-op)
    pub fn remove_item(&self, product_id: i64) -> AppResult<Cart> {
        self.mutate(|cart| {
            cart.remove_item(product_id);
            Ok(())
        })
    }

    /// Overwrite a line item's quantity; zero or less removes it
    pub fn set_quantity(&self, product_id: i64, quantity: i64) -> AppResult<Cart> {
        self.mutate(|cart| {
            cart.set_quantity(product_id, quantity);
            Ok(())
        })
    }

    /// Empty the active cart
    pub fn clear(&self) -> AppResult<()> {
        let owner = self.owner.read().clone();
        let key = owner.storage_key(&self.namespace);
        self.store.remove(&key);
        self.publish(&Cart::new());
        Ok(())
    }

    /// Consolidate the guest cart into a user's cart
    ///
    /// The merged result is persisted under the user slot first; the guest
    /// slot is deleted only after that write succeeds, so a persistence
    /// failure cannot lose the guest cart. The active owner becomes the
    /// user afterwards.
    pub fn merge_guest_into(&self, user_id: &str) -> AppResult<Cart> {
        let guest_key = CartOwner::Guest.storage_key(&self.namespace);
        let user_owner = CartOwner::User(user_id.to_string());
        let user_key = user_owner.storage_key(&self.namespace);

        let guest: Cart = storage::read_json(self.store.as_ref(), &guest_key)
            .ok()
            .flatten()
            .unwrap_or_default();
        let user: Cart = storage::read_json(self.store.as_ref(), &user_key)
            .ok()
            .flatten()
            .unwrap_or_default();

        let merged = merge_carts(&user, &guest);
        storage::write_json(self.store.as_ref(), &user_key, &merged)?;
        self.store.remove(&guest_key);

        tracing::info!(
            user_id,
            guest_items = guest.total_items(),
            merged_items = merged.total_items(),
            "guest cart merged"
        );

        *self.owner.write() = user_owner;
        self.publish(&merged);
        Ok(merged)
    }

    fn mutate(&self, op: impl FnOnce(&mut Cart) -> AppResult<()>) -> AppResult<Cart> {
        let owner = self.owner.write();
        let key = owner.storage_key(&self.namespace);

        let mut cart: Cart = storage::read_json(self.store.as_ref(), &key)
            .ok()
            .flatten()
            .unwrap_or_default();
        op(&mut cart)?;
        storage::write_json(self.store.as_ref(), &key, &cart)?;
        drop(owner);

        self.publish(&cart);
        Ok(cart)
    }

    fn publish(&self, cart: &Cart) {
        let _ = self.summary_tx.send(CartSummary::of(cart));
    }
}
