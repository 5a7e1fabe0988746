//! Catalog Service - fetch-once product catalog with in-memory caching
//!
//! The catalog is a static JSON array fetched over HTTP once per process
//! and served from memory afterwards. There is no pagination and no cache
//! validation contract on the feed.

use crate::config::ClientConfig;
use parking_lot::RwLock;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Product;
use std::sync::Arc;

/// Fetch-once catalog cache
#[derive(Clone)]
pub struct CatalogService {
    http: reqwest::Client,
    url: String,
    products: Arc<RwLock<Vec<Product>>>,
    loaded: Arc<RwLock<bool>>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("url", &self.url)
            .field("products", &self.products.read().len())
            .field("loaded", &*self.loaded.read())
            .finish()
    }
}

impl CatalogService {
    /// Create a catalog service from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            url: config.catalog_url.clone(),
            products: Arc::new(RwLock::new(Vec::new())),
            loaded: Arc::new(RwLock::new(false)),
        }
    }

    /// Create a pre-loaded catalog (offline use and tests)
    pub fn with_products(products: Vec<Product>) -> Self {
        let service = Self::new(&ClientConfig::default());
        *service.products.write() = products;
        *service.loaded.write() = true;
        service
    }

    /// Fetch the catalog feed and replace the cache
    pub async fn load(&self) -> AppResult<()> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(url = %self.url, %err, "catalog fetch failed");
                AppError::with_message(ErrorCode::CatalogUnavailable, err.to_string())
            })?;

        if !response.status().is_success() {
            tracing::warn!(url = %self.url, status = %response.status(), "catalog fetch failed");
            return Err(AppError::new(ErrorCode::CatalogUnavailable)
                .with_detail("status", response.status().as_u16() as i64));
        }

        let products: Vec<Product> = response.json().await.map_err(|err| {
            AppError::with_message(ErrorCode::CatalogInvalid, err.to_string())
        })?;

        tracing::info!(count = products.len(), "catalog loaded");
        *self.products.write() = products;
        *self.loaded.write() = true;
        Ok(())
    }

    /// Fetch the catalog unless it has already been loaded
    pub async fn ensure_loaded(&self) -> AppResult<()> {
        if *self.loaded.read() {
            return Ok(());
        }
        self.load().await
    }

    /// Snapshot of the full catalog
    pub fn products(&self) -> Vec<Product> {
        self.products.read().clone()
    }

    /// Look up a single product by id
    pub fn product(&self, id: i64) -> Option<Product> {
        self.products.read().iter().find(|p| p.id == id).cloned()
    }

    /// Distinct category names, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .products
            .read()
            .iter()
            .map(|p| p.category.clone())
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}
