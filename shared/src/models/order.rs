//! Order Model
//!
//! An order is the immutable checkout snapshot handed to the document
//! store. Once submitted it is owned by the store; the client only reads
//! it back and requests status transitions.

use super::cart::CartLineItem;
use crate::error::{AppError, AppResult, ErrorCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Waiting for a bank transfer to the virtual account
    #[default]
    PendingPayment,
    /// Transfer received
    Paid,
    /// Fulfilled and closed
    Completed,
    /// Abandoned or voided before payment
    Cancelled,
}

impl OrderStatus {
    /// Whether a transition from `self` to `next` is allowed
    ///
    /// PENDING_PAYMENT -> PAID | CANCELLED, PAID -> COMPLETED;
    /// COMPLETED and CANCELLED are terminal.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::PendingPayment, OrderStatus::Paid)
                | (OrderStatus::PendingPayment, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Completed)
        )
    }

    /// Error describing why this status cannot change
    pub fn transition_error(self, next: OrderStatus) -> AppError {
        let code = match self {
            OrderStatus::Paid => ErrorCode::OrderAlreadyPaid,
            OrderStatus::Completed => ErrorCode::OrderAlreadyCompleted,
            OrderStatus::Cancelled => ErrorCode::OrderAlreadyCancelled,
            OrderStatus::PendingPayment => ErrorCode::OrderInvalidTransition,
        };
        AppError::new(code)
            .with_detail("from", format!("{:?}", self))
            .with_detail("to", format!("{:?}", next))
    }
}

/// Delivery details collected at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RecipientInfo {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 6, message = "phone number is too short"))]
    pub phone: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(email)]
    pub email: String,
}

/// Payment summary for a pending order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Sum of line totals before discount
    pub subtotal: i64,
    /// Sum of line discounts
    pub discount: i64,
    /// Amount to transfer
    pub total: i64,
    /// Bank-transfer destination reference
    pub virtual_account: String,
    /// Transfer deadline
    pub expires_at: DateTime<Utc>,
}

/// Checkout snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    /// Snapshot of the cart line items at checkout time
    pub items: Vec<CartLineItem>,
    pub recipient: RecipientInfo,
    pub payment: PaymentInfo,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Apply a status transition, updating the modification timestamp
    pub fn transition_to(&mut self, next: OrderStatus) -> AppResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(self.status.transition_error(next));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}
