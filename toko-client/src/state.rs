//! Application context
//!
//! [`StoreContext`] holds one shared reference to every service. It is
//! constructed once at startup and passed to whatever needs identity,
//! cart or catalog access. There are no ambient globals anywhere.

use crate::cart::CartService;
use crate::catalog::CatalogService;
use crate::checkout::CheckoutService;
use crate::config::ClientConfig;
use crate::discovery;
use crate::identity::{Identity, IdentityProvider};
use crate::orders::{DocumentStore, OrdersService};
use crate::session::SessionSync;
use crate::storage::KeyValueStore;
use shared::error::AppResult;
use shared::models::Product;
use shared::query::QueryState;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;

/// Shared handle to all storefront services
///
/// Cloning is cheap; every field is either plain configuration or an
/// `Arc`-backed service.
#[derive(Clone)]
pub struct StoreContext {
    pub config: ClientConfig,
    pub storage: Arc<dyn KeyValueStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub catalog: CatalogService,
    pub cart: Arc<CartService>,
    pub orders: OrdersService,
    pub checkout: CheckoutService,
    session: Arc<SessionSync>,
    signing_out: Arc<AtomicBool>,
}

impl StoreContext {
    /// Wire up all services against the given collaborators
    pub fn initialize(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStore>,
        identity: Arc<dyn IdentityProvider>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        let catalog = CatalogService::new(&config);
        let cart = Arc::new(CartService::new(storage.clone(), &config));
        let orders = OrdersService::new(documents);
        let checkout = CheckoutService::new(
            cart.clone(),
            identity.clone(),
            orders.clone(),
            storage.clone(),
            &config,
        );
        let session = Arc::new(SessionSync::new(cart.clone(), storage.clone(), &config));

        Self {
            config,
            storage,
            identity,
            catalog,
            cart,
            orders,
            checkout,
            session,
            signing_out: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the catalog service (pre-loaded catalogs, tests)
    pub fn with_catalog(mut self, catalog: CatalogService) -> Self {
        self.catalog = catalog;
        self
    }

    /// Start the session watcher
    ///
    /// Must be called once after construction; identity transitions are
    /// not observed before this.
    pub fn start_background_tasks(&self) -> JoinHandle<()> {
        self.session.clone().spawn(self.identity.clone())
    }

    /// Run the discovery pipeline against the (lazily loaded) catalog
    pub async fn discover(&self, query: &QueryState) -> AppResult<Vec<Product>> {
        self.catalog.ensure_loaded().await?;
        Ok(discovery::run(&self.catalog.products(), query))
    }

    /// Register a new account (also starts its session)
    pub async fn create_account(&self, email: &str, password: &str) -> AppResult<Identity> {
        self.identity.create_account(email, password).await
    }

    /// Sign in to an existing account
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Identity> {
        self.identity.sign_in(email, password).await
    }

    /// Sign out, ignoring repeat clicks while one sign-out is in flight
    pub async fn sign_out(&self) -> AppResult<()> {
        if self
            .signing_out
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("sign-out already in flight");
            return Ok(());
        }
        let result = self.identity.sign_out().await;
        self.signing_out.store(false, Ordering::SeqCst);
        result
    }
}
