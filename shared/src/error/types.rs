//! Error type and result alias

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type for the storefront engine, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Create an empty cart error
    pub fn cart_empty() -> Self {
        Self::new(ErrorCode::CartEmpty)
    }

    /// Create an invalid quantity error
    pub fn quantity_invalid(quantity: i64) -> Self {
        Self::new(ErrorCode::QuantityInvalid).with_detail("quantity", quantity)
    }

    /// Create an external service error
    pub fn service(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ServiceError, msg)
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NetworkError, msg)
    }

    /// Create a storage write error
    pub fn storage_write(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StorageWriteFailed, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create an invalid request error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    /// Check whether this error only means "nothing there" (a missing
    /// storage key or record), which callers treat as an empty result
    /// rather than a failure.
    pub fn is_data_absent(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::StorageKeyMissing | ErrorCode::NotFound
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_message(ErrorCode::SerializationError, err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut err = Self::new(ErrorCode::ValidationFailed);
        for (field, field_errors) in errors.field_errors() {
            let reasons: Vec<Value> = field_errors
                .iter()
                .map(|e| Value::String(e.code.to_string()))
                .collect();
            err = err.with_detail(field.to_string(), Value::Array(reasons));
        }
        err
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
