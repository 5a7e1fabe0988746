//! Shared types for the Toko storefront
//!
//! Common types used across the workspace: domain models, the unified
//! error system, and the discovery query types.

pub mod error;
pub mod models;
pub mod query;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Cart, CartLineItem, Order, OrderStatus, PaymentInfo, Product, RecipientInfo};
pub use query::{QueryState, SortKey, StatusFilter};
