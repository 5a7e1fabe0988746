//! Checkout Service
//!
//! Turns the current cart into an immutable order snapshot: gate checks
//! (signed-in identity, non-empty cart), recipient validation, payment
//! summary with a generated virtual-account reference, submission to the
//! document store, and the transient payload handoff to the payment view.

use crate::cart::CartService;
use crate::config::ClientConfig;
use crate::identity::IdentityProvider;
use crate::orders::OrdersService;
use crate::storage::{self, KeyValueStore};
use chrono::{Duration, Utc};
use rand::Rng;
use shared::error::{AppError, AppResult};
use shared::models::{Order, OrderStatus, PaymentInfo, RecipientInfo};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

const VA_RANDOM_DIGITS: usize = 12;

/// Checkout orchestration
#[derive(Clone)]
pub struct CheckoutService {
    cart: Arc<CartService>,
    identity: Arc<dyn IdentityProvider>,
    orders: OrdersService,
    store: Arc<dyn KeyValueStore>,
    namespace: String,
    payment_window: Duration,
    va_bank_prefix: String,
}

impl CheckoutService {
    pub fn new(
        cart: Arc<CartService>,
        identity: Arc<dyn IdentityProvider>,
        orders: OrdersService,
        store: Arc<dyn KeyValueStore>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            cart,
            identity,
            orders,
            store,
            namespace: config.storage_namespace.clone(),
            payment_window: Duration::hours(config.payment_window_hours),
            va_bank_prefix: config.va_bank_prefix.clone(),
        }
    }

    fn pending_key(&self) -> String {
        format!("{}:checkout:pending", self.namespace)
    }

    /// Check out the current cart
    ///
    /// Guest checkout is not permitted. On success the order snapshot has
    /// been submitted to the document store, stashed for the payment view,
    /// and the cart slot has been cleared.
    pub async fn checkout(&self, recipient: RecipientInfo) -> AppResult<Order> {
        let identity = self
            .identity
            .current()
            .ok_or_else(AppError::not_authenticated)?;

        let cart = self.cart.cart();
        if cart.is_empty() {
            return Err(AppError::cart_empty());
        }

        recipient.validate().map_err(AppError::from)?;

        let subtotal = cart.total_price();
        let discount = cart.total_discount();
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: identity.uid,
            items: cart.items().to_vec(),
            recipient,
            payment: PaymentInfo {
                subtotal,
                discount,
                total: (subtotal - discount).max(0),
                virtual_account: self.generate_virtual_account(),
                expires_at: now + self.payment_window,
            },
            status: OrderStatus::PendingPayment,
            created_at: now,
            updated_at: now,
        };

        self.orders.submit(&order).await?;

        // the payment view reads this back; losing it only degrades the UI,
        // the order itself is already persisted
        if let Err(err) = storage::write_json(self.store.as_ref(), &self.pending_key(), &order) {
            tracing::warn!(%err, order_id = %order.id, "failed to stash pending payload");
        }

        self.cart.clear()?;
        Ok(order)
    }

    /// Take the payload stashed for the payment view
    ///
    /// Read-once: the key is removed as it is read. Absent or corrupt
    /// payloads yield `None`.
    pub fn take_pending(&self) -> Option<Order> {
        let key = self.pending_key();
        let pending = storage::read_json(self.store.as_ref(), &key)
            .ok()
            .flatten();
        self.store.remove(&key);
        pending
    }

    fn generate_virtual_account(&self) -> String {
        let mut rng = rand::thread_rng();
        let digits: String = (0..VA_RANDOM_DIGITS)
            .map(|_| char::from(b'0' + rng.gen_range(0..10)))
            .collect();
        format!("{}{}", self.va_bank_prefix, digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MockIdentityProvider;
    use crate::orders::MemoryDocumentStore;
    use crate::storage::MemoryStore;
    use shared::error::ErrorCode;
    use shared::models::Product;

    fn recipient() -> RecipientInfo {
        RecipientInfo {
            name: "Budi".into(),
            phone: "08123456789".into(),
            address: "Jl. Sudirman 1, Jakarta".into(),
            email: "budi@example.com".into(),
        }
    }

    fn product(id: i64, price: i64, discount: i64) -> Product {
        Product {
            id,
            name: format!("item-{}", id),
            category: "Minuman".to_string(),
            description: String::new(),
            price,
            rating: 4.0,
            sold: 0,
            discount,
            image: String::new(),
            tags: None,
        }
    }

    struct Harness {
        provider: Arc<MockIdentityProvider>,
        cart: Arc<CartService>,
        orders: OrdersService,
        checkout: CheckoutService,
    }

    fn harness() -> Harness {
        let config = ClientConfig::default();
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let provider = Arc::new(MockIdentityProvider::new());
        let cart = Arc::new(CartService::new(store.clone(), &config));
        let orders = OrdersService::new(Arc::new(MemoryDocumentStore::new()));
        let checkout = CheckoutService::new(
            cart.clone(),
            provider.clone(),
            orders.clone(),
            store,
            &config,
        );
        Harness { provider, cart, orders, checkout }
    }

    #[tokio::test]
    async fn test_guest_checkout_is_rejected() {
        let h = harness();
        h.cart.add_item(&product(1, 20000, 0), 1).unwrap();

        let err = h.checkout.checkout(recipient()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_empty_cart_checkout_is_rejected() {
        let h = harness();
        h.provider
            .create_account("budi@example.com", "rahasia-sekali")
            .await
            .unwrap();

        let err = h.checkout.checkout(recipient()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartEmpty);
        // no payload was produced
        assert!(h.checkout.take_pending().is_none());
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_rejected() {
        let h = harness();
        h.provider
            .create_account("budi@example.com", "rahasia-sekali")
            .await
            .unwrap();
        h.cart.add_item(&product(1, 20000, 0), 1).unwrap();

        let bad = RecipientInfo { email: "nope".into(), ..recipient() };
        let err = h.checkout.checkout(bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_checkout_builds_snapshot_and_clears_cart() {
        let h = harness();
        h.provider
            .create_account("budi@example.com", "rahasia-sekali")
            .await
            .unwrap();
        h.cart.add_item(&product(1, 20000, 0), 2).unwrap();
        h.cart.add_item(&product(2, 15000, 5000), 1).unwrap();

        let order = h.checkout.checkout(recipient()).await.unwrap();

        assert_eq!(order.status, OrderStatus::PendingPayment);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.payment.subtotal, 55000);
        assert_eq!(order.payment.discount, 5000);
        assert_eq!(order.payment.total, 50000);
        assert!(order.payment.virtual_account.starts_with("8808"));
        assert_eq!(order.payment.virtual_account.len(), 4 + VA_RANDOM_DIGITS);
        assert!(order.payment.expires_at > order.created_at);

        // submitted to the document store
        let stored = h.orders.order(&order.id).await.unwrap();
        assert_eq!(stored, order);

        // the cart is empty afterwards
        assert!(h.cart.cart().is_empty());
    }

    #[tokio::test]
    async fn test_pending_payload_is_read_once() {
        let h = harness();
        h.provider
            .create_account("budi@example.com", "rahasia-sekali")
            .await
            .unwrap();
        h.cart.add_item(&product(1, 20000, 0), 1).unwrap();

        let order = h.checkout.checkout(recipient()).await.unwrap();

        let pending = h.checkout.take_pending().unwrap();
        assert_eq!(pending.id, order.id);
        // second read finds nothing
        assert!(h.checkout.take_pending().is_none());
    }
}
