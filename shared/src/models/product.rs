//! Product Model

use serde::{Deserialize, Serialize};

/// Catalog product entity
///
/// Loaded read-only from the static catalog feed; never created or mutated
/// by the client. Numeric fields default to 0 so a record with missing
/// price/sold/discount still parses (the feed is not under our control).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product id; 0 means the record arrived without one
    #[serde(default)]
    pub id: i64,
    pub name: String,
    /// Category name (e.g. "Minuman")
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Price in the smallest currency unit
    #[serde(default)]
    pub price: i64,
    /// Average review rating, 0.0 - 5.0
    #[serde(default)]
    pub rating: f64,
    /// Units sold
    #[serde(default)]
    pub sold: i64,
    /// Absolute discount in the smallest currency unit, 0 = none
    #[serde(default)]
    pub discount: i64,
    /// Image URL
    #[serde(default)]
    pub image: String,
    /// Free-form search tags
    pub tags: Option<String>,
}

impl Product {
    /// Whether this product carries a discount
    pub fn has_discount(&self) -> bool {
        self.discount > 0
    }

    /// Unit price after discount, never below zero
    pub fn final_price(&self) -> i64 {
        (self.price - self.discount).max(0)
    }
}
