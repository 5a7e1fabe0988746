//! Cart Model
//!
//! A cart is an ordered sequence of line items owned by exactly one
//! identity slot (guest or an authenticated user id). The operations here
//! are pure; persistence and slot ownership live in the client crate.

use super::product::Product;
use crate::error::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};

/// One product-and-quantity pairing within a cart or order
///
/// Numeric fields default to 0 on deserialization so a stored cart written
/// by an older build (or a hand-edited one) never fails to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product id this line refers to
    pub id: i64,
    pub name: String,
    /// Unit price in the smallest currency unit
    #[serde(default)]
    pub price: i64,
    /// Per-unit discount carried over from the product at add time
    #[serde(default)]
    pub discount: i64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub quantity: i64,
}

impl CartLineItem {
    /// Build a line item from a catalog product
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            discount: product.discount,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Line total before discount
    pub fn line_total(&self) -> i64 {
        self.price.saturating_mul(self.quantity)
    }

    /// Line discount total
    pub fn line_discount(&self) -> i64 {
        self.discount.saturating_mul(self.quantity)
    }
}

/// Ordered collection of line items
///
/// Invariant: at most one line item per product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Find the line item for a product id
    pub fn find(&self, product_id: i64) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == product_id)
    }

    /// Add a product to the cart
    ///
    /// If a line item with the same product id exists its quantity is
    /// incremented by `quantity` (no upper bound); otherwise a new line
    /// item is appended.
    ///
    /// Fails when `quantity < 1` or when the product record carries no id.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> AppResult<()> {
        if quantity < 1 {
            return Err(AppError::quantity_invalid(quantity));
        }
        if product.id == 0 {
            return Err(
                AppError::new(ErrorCode::RequiredField).with_detail("field", "id")
            );
        }

        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => self.items.push(CartLineItem::from_product(product, quantity)),
        }
        Ok(())
    }

    /// Remove every line item matching the product id
    ///
    /// Removing an absent id is a no-op, not an error.
    pub fn remove_item(&mut self, product_id: i64) {
        self.items.retain(|item| item.id != product_id);
    }

    /// Overwrite the quantity of a line item
    ///
    /// A quantity of zero or less removes the item. Setting the quantity
    /// of an absent id does nothing.
    pub fn set_quantity(&mut self, product_id: i64, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product_id) {
            item.quantity = quantity;
        }
    }

    /// Drop all line items
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total unit count across all line items
    pub fn total_items(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Total price (before discount) across all line items
    pub fn total_price(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.line_total()))
    }

    /// Total discount across all line items
    pub fn total_discount(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, item| acc.saturating_add(item.line_discount()))
    }
}

impl From<Vec<CartLineItem>> for Cart {
    fn from(items: Vec<CartLineItem>) -> Self {
        Self { items }
    }
}

/// Merge a guest cart into an authenticated user's cart
///
/// For each guest line item: if the user cart already holds the product id,
/// the user quantity is the base and the guest quantity is added to it;
/// otherwise the guest line item is appended in guest order. Returns a new
/// cart; neither input is mutated.
pub fn merge_carts(user: &Cart, guest: &Cart) -> Cart {
    let mut merged = user.clone();
    for item in guest.items() {
        match merged.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity)
            }
            None => merged.items.push(item.clone()),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, price: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            category: "Minuman".to_string(),
            description: String::new(),
            price,
            rating: 4.0,
            sold: 0,
            discount: 0,
            image: String::new(),
            tags: None,
        }
    }

    fn line(id: i64, quantity: i64) -> CartLineItem {
        CartLineItem {
            id,
            name: format!("item-{}", id),
            price: 1000,
            discount: 0,
            image: String::new(),
            quantity,
        }
    }

    #[test]
    fn test_add_item_appends_then_increments() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, "Kopi", 20000), 2).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.find(1).unwrap().quantity, 2);

        cart.add_item(&product(1, "Kopi", 20000), 3).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.find(1).unwrap().quantity, 5);
    }

    #[test]
    fn test_add_item_rejects_bad_input() {
        let mut cart = Cart::new();
        let err = cart.add_item(&product(1, "Kopi", 20000), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::QuantityInvalid);

        let err = cart.add_item(&product(0, "Ghost", 0), 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, "Kopi", 20000), 2).unwrap();
        cart.remove_item(1);
        assert!(cart.is_empty());
        // absent id is a no-op
        cart.remove_item(99);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_roundtrip() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, "Kopi", 20000), 2).unwrap();

        for n in [1, 7, 42] {
            cart.set_quantity(1, n);
            assert_eq!(cart.find(1).unwrap().quantity, n);
        }

        cart.set_quantity(1, 0);
        assert!(cart.find(1).is_none());

        cart.add_item(&product(1, "Kopi", 20000), 2).unwrap();
        cart.set_quantity(1, -3);
        assert!(cart.find(1).is_none());
    }

    #[test]
    fn test_totals_treat_missing_fields_as_zero() {
        // Stored cart written without price/quantity fields
        let json = r#"[{"id":1,"name":"Kopi"},{"id":2,"name":"Teh","price":15000,"quantity":2}]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), 30000);
    }

    #[test]
    fn test_merge_scenario() {
        let user: Cart = vec![line(1, 1), line(2, 3)].into();
        let guest: Cart = vec![line(1, 2)].into();

        let merged = merge_carts(&user, &guest);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.find(1).unwrap().quantity, 3);
        assert_eq!(merged.find(2).unwrap().quantity, 3);
    }

    #[test]
    fn test_merge_appends_unmatched_guest_items() {
        let user: Cart = vec![line(1, 1)].into();
        let guest: Cart = vec![line(3, 4), line(1, 1)].into();

        let merged = merge_carts(&user, &guest);
        assert_eq!(merged.items()[0].id, 1);
        assert_eq!(merged.items()[1].id, 3);
        assert_eq!(merged.find(1).unwrap().quantity, 2);
    }

    #[test]
    fn test_merge_with_empty_guest_is_idempotent() {
        let user: Cart = vec![line(1, 1), line(2, 3)].into();
        let guest: Cart = vec![line(1, 2)].into();

        let once = merge_carts(&user, &guest);
        let twice = merge_carts(&once, &Cart::new());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_cart_serde_roundtrip() {
        let cart: Cart = vec![line(1, 2)].into();
        let json = serde_json::to_string(&cart).unwrap();
        // transparent: a cart serializes as a bare array
        assert!(json.starts_with('['));
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(cart, back);
    }
}
