//! Domain models for the storefront
//!
//! - [`Product`]: read-only catalog entity
//! - [`Cart`] / [`CartLineItem`]: per-identity shopping cart
//! - [`Order`] and friends: checkout snapshot owned by the document store

mod cart;
mod order;
mod product;

pub use cart::{Cart, CartLineItem, merge_carts};
pub use order::{Order, OrderStatus, PaymentInfo, RecipientInfo};
pub use product::Product;
