//! Session synchronization
//!
//! One subscription to the identity provider's change notification drives
//! everything that depends on login state, most importantly the one-shot
//! guest cart consolidation. There is deliberately no polling anywhere.

use crate::cart::{CartOwner, CartService};
use crate::config::ClientConfig;
use crate::identity::{Identity, IdentityProvider};
use crate::storage::KeyValueStore;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Reacts to identity transitions
///
/// On sign-in the guest cart is merged into the user's cart exactly once
/// per login session: a marker key guards against duplicate notification
/// delivery double-merging. The marker is cleared on sign-out so the next
/// login session merges again.
pub struct SessionSync {
    cart: Arc<CartService>,
    store: Arc<dyn KeyValueStore>,
    namespace: String,
    last_uid: RwLock<Option<String>>,
}

impl SessionSync {
    pub fn new(
        cart: Arc<CartService>,
        store: Arc<dyn KeyValueStore>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            cart,
            store,
            namespace: config.storage_namespace.clone(),
            last_uid: RwLock::new(None),
        }
    }

    /// Subscribe to the provider and react to transitions until it closes
    pub fn spawn(self: Arc<Self>, provider: Arc<dyn IdentityProvider>) -> JoinHandle<()> {
        let mut rx = provider.subscribe();
        tokio::spawn(async move {
            // the subscription reports the state at startup too
            let initial = rx.borrow_and_update().clone();
            self.handle_transition(initial.as_ref());

            while rx.changed().await.is_ok() {
                let identity = rx.borrow_and_update().clone();
                self.handle_transition(identity.as_ref());
            }
            tracing::debug!("identity channel closed, session sync stopped");
        })
    }

    /// React to one session state observation
    pub fn handle_transition(&self, identity: Option<&Identity>) {
        match identity {
            Some(identity) => self.handle_sign_in(identity),
            None => self.handle_sign_out(),
        }
    }

    fn merge_marker_key(&self, uid: &str) -> String {
        format!("{}:session:merged:{}", self.namespace, uid)
    }

    fn handle_sign_in(&self, identity: &Identity) {
        *self.last_uid.write() = Some(identity.uid.clone());

        let marker = self.merge_marker_key(&identity.uid);
        if self.store.get(&marker).is_some() {
            tracing::debug!(uid = %identity.uid, "guest cart already merged this session");
            self.cart.set_owner(CartOwner::User(identity.uid.clone()));
            return;
        }

        match self.cart.merge_guest_into(&identity.uid) {
            Ok(_) => {
                if let Err(err) = self.store.set(&marker, "1") {
                    tracing::warn!(%err, "failed to record merge marker");
                }
            }
            Err(err) => {
                // the guest slot is still intact; keep working against it
                tracing::warn!(%err, "guest cart merge failed, staying on guest cart");
            }
        }
    }

    fn handle_sign_out(&self) {
        if let Some(uid) = self.last_uid.write().take() {
            self.store.remove(&self.merge_marker_key(&uid));
        }
        self.cart.set_owner(CartOwner::Guest);
    }
}
