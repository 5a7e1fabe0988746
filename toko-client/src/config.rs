//! Client configuration

/// Storefront engine configuration
///
/// # Environment variables
///
/// All fields can be overridden through environment variables:
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | CATALOG_URL | http://localhost:3000/products.json | Static catalog feed |
/// | REQUEST_TIMEOUT | 30 | HTTP timeout in seconds |
/// | STORAGE_NAMESPACE | toko | Prefix for storage keys |
/// | PAYMENT_WINDOW_HOURS | 24 | Virtual-account transfer deadline |
/// | VA_BANK_PREFIX | 8808 | Virtual-account bank prefix |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL of the static catalog feed (a JSON array of products)
    pub catalog_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Prefix for every storage key this engine writes
    pub storage_namespace: String,
    /// Hours until a pending order's virtual account expires
    pub payment_window_hours: i64,
    /// Bank prefix for generated virtual-account numbers
    pub va_bank_prefix: String,
}

impl ClientConfig {
    /// Create a configuration pointing at a catalog feed
    pub fn new(catalog_url: impl Into<String>) -> Self {
        Self {
            catalog_url: catalog_url.into(),
            timeout: 30,
            storage_namespace: "toko".to_string(),
            payment_window_hours: 24,
            va_bank_prefix: "8808".to_string(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to the defaults above.
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("CATALOG_URL")
                .unwrap_or_else(|_| "http://localhost:3000/products.json".into()),
        );
        if let Ok(timeout) = std::env::var("REQUEST_TIMEOUT")
            && let Ok(seconds) = timeout.parse()
        {
            config.timeout = seconds;
        }
        if let Ok(namespace) = std::env::var("STORAGE_NAMESPACE") {
            config.storage_namespace = namespace;
        }
        if let Ok(hours) = std::env::var("PAYMENT_WINDOW_HOURS")
            && let Ok(hours) = hours.parse()
        {
            config.payment_window_hours = hours;
        }
        if let Ok(prefix) = std::env::var("VA_BANK_PREFIX") {
            config.va_bank_prefix = prefix;
        }
        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the storage key namespace
    pub fn with_storage_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.storage_namespace = namespace.into();
        self
    }

    /// Set the payment window
    pub fn with_payment_window_hours(mut self, hours: i64) -> Self {
        self.payment_window_hours = hours;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000/products.json")
    }
}
