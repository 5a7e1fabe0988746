//! Unified error codes for the Toko storefront
//!
//! This module defines all error codes used across the engine and its
//! consumers. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Cart errors
//! - 3xxx: Order errors
//! - 4xxx: Payment errors
//! - 5xxx: Catalog errors
//! - 6xxx: Storage errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// No account exists for this email
    AccountNotFound = 1003,
    /// Email is already registered
    EmailInUse = 1004,
    /// Password does not meet the minimum requirements
    WeakPassword = 1005,
    /// Email address is malformed
    InvalidEmail = 1006,
    /// Too many failed sign-in attempts
    TooManyAttempts = 1007,
    /// Session has expired
    SessionExpired = 1008,

    // ==================== 2xxx: Cart ====================
    /// Cart has no line items
    CartEmpty = 2001,
    /// Cart line item not found
    CartItemNotFound = 2002,
    /// Quantity must be at least 1
    QuantityInvalid = 2003,

    // ==================== 3xxx: Order ====================
    /// Order not found
    OrderNotFound = 3001,
    /// Order has already been paid
    OrderAlreadyPaid = 3002,
    /// Order has already been completed
    OrderAlreadyCompleted = 3003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 3004,
    /// Requested status change is not allowed
    OrderInvalidTransition = 3005,

    // ==================== 4xxx: Payment ====================
    /// Payment window has expired
    PaymentExpired = 4001,
    /// Virtual account reference is invalid
    VirtualAccountInvalid = 4002,

    // ==================== 5xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 5001,
    /// Catalog feed could not be fetched
    CatalogUnavailable = 5002,
    /// Catalog feed could not be parsed
    CatalogInvalid = 5003,

    // ==================== 6xxx: Storage ====================
    /// Storage read failed
    StorageReadFailed = 6001,
    /// Storage write failed
    StorageWriteFailed = 6002,
    /// Expected storage key is missing
    StorageKeyMissing = 6003,
    /// Storage capacity ceiling reached
    StorageQuotaExceeded = 6004,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network error
    NetworkError = 9002,
    /// External service call failed
    ServiceError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Serialization error
    SerializationError = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::AccountNotFound => "No account exists for this email",
            ErrorCode::EmailInUse => "Email is already registered",
            ErrorCode::WeakPassword => "Password must be at least 8 characters",
            ErrorCode::InvalidEmail => "Email address is malformed",
            ErrorCode::TooManyAttempts => "Too many failed attempts",
            ErrorCode::SessionExpired => "Session has expired",

            // Cart
            ErrorCode::CartEmpty => "Cart has no line items",
            ErrorCode::CartItemNotFound => "Cart line item not found",
            ErrorCode::QuantityInvalid => "Quantity must be at least 1",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderInvalidTransition => "Requested status change is not allowed",

            // Payment
            ErrorCode::PaymentExpired => "Payment window has expired",
            ErrorCode::VirtualAccountInvalid => "Virtual account reference is invalid",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::CatalogUnavailable => "Catalog feed could not be fetched",
            ErrorCode::CatalogInvalid => "Catalog feed could not be parsed",

            // Storage
            ErrorCode::StorageReadFailed => "Storage read failed",
            ErrorCode::StorageWriteFailed => "Storage write failed",
            ErrorCode::StorageKeyMissing => "Expected storage key is missing",
            ErrorCode::StorageQuotaExceeded => "Storage capacity ceiling reached",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::ServiceError => "External service call failed",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::SerializationError => "Serialization error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::AccountNotFound),
            1004 => Ok(ErrorCode::EmailInUse),
            1005 => Ok(ErrorCode::WeakPassword),
            1006 => Ok(ErrorCode::InvalidEmail),
            1007 => Ok(ErrorCode::TooManyAttempts),
            1008 => Ok(ErrorCode::SessionExpired),

            // Cart
            2001 => Ok(ErrorCode::CartEmpty),
            2002 => Ok(ErrorCode::CartItemNotFound),
            2003 => Ok(ErrorCode::QuantityInvalid),

            // Order
            3001 => Ok(ErrorCode::OrderNotFound),
            3002 => Ok(ErrorCode::OrderAlreadyPaid),
            3003 => Ok(ErrorCode::OrderAlreadyCompleted),
            3004 => Ok(ErrorCode::OrderAlreadyCancelled),
            3005 => Ok(ErrorCode::OrderInvalidTransition),

            // Payment
            4001 => Ok(ErrorCode::PaymentExpired),
            4002 => Ok(ErrorCode::VirtualAccountInvalid),

            // Catalog
            5001 => Ok(ErrorCode::ProductNotFound),
            5002 => Ok(ErrorCode::CatalogUnavailable),
            5003 => Ok(ErrorCode::CatalogInvalid),

            // Storage
            6001 => Ok(ErrorCode::StorageReadFailed),
            6002 => Ok(ErrorCode::StorageWriteFailed),
            6003 => Ok(ErrorCode::StorageKeyMissing),
            6004 => Ok(ErrorCode::StorageQuotaExceeded),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::NetworkError),
            9003 => Ok(ErrorCode::ServiceError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::SerializationError),

            other => Err(InvalidErrorCode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::CartEmpty,
            ErrorCode::OrderInvalidTransition,
            ErrorCode::StorageQuotaExceeded,
            ErrorCode::ServiceError,
        ] {
            let raw = code.code();
            assert_eq!(ErrorCode::try_from(raw), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::CartEmpty).unwrap();
        assert_eq!(json, "2001");

        let code: ErrorCode = serde_json::from_str("1001").unwrap();
        assert_eq!(code, ErrorCode::NotAuthenticated);
    }
}
