//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Frontend                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  { "command": "advanceCheckout" }                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │  Command Function  → Result<T, ApiError>                         │   │
//! │  │                                                                  │   │
//! │  │  CheckoutError::StepGateFailed ──► STEP_INCOMPLETE + fields      │   │
//! │  │  CoreError::TemplateNotFound ────► NOT_FOUND                     │   │
//! │  │  GatewayError ───────────────────► GATEWAY_ERROR                 │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  { "ok": false, "error": { "code": "STEP_INCOMPLETE",                   │
//! │    "message": "...", "fields": [{ "kind": "required",                   │
//! │    "field": "city" }] } }                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use keytowish_core::{CheckoutError, CoreError, ValidationError};
use serde::Serialize;
use ts_rs::TS;

use crate::gateway::GatewayError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Template not found: zz9"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Field-level problems, so the form can mark every bad input at once
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ValidationError>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Template or resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Checkout started with an empty cart
    EmptyCart,

    /// A checkout step gate refused to advance
    StepIncomplete,

    /// Checkout action not allowed from the current step
    InvalidTransition,

    /// No checkout session is open
    NoCheckout,

    /// The open session is being submitted and cannot change
    OrderInProgress,

    /// Order submission service failed or rejected the order
    GatewayError,

    /// Malformed command
    BadRequest,

    /// Internal server error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error carrying every offending field.
    pub fn validation(message: impl Into<String>, fields: Vec<ValidationError>) -> Self {
        ApiError {
            fields,
            ..ApiError::new(ErrorCode::ValidationError, message)
        }
    }

    /// Creates the "no checkout in progress" error.
    pub fn no_checkout() -> Self {
        ApiError::new(ErrorCode::NoCheckout, "No checkout in progress")
    }

    /// Creates the "order is being placed" error.
    pub fn order_in_progress() -> Self {
        ApiError::new(
            ErrorCode::OrderInProgress,
            "An order is being placed for this checkout",
        )
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts checkout errors to API errors.
impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        let message = err.to_string();
        match err {
            CheckoutError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, message),
            CheckoutError::StepGateFailed { fields, .. } => ApiError {
                fields,
                ..ApiError::new(ErrorCode::StepIncomplete, message)
            },
            CheckoutError::InvalidTransition { .. } | CheckoutError::NotEditable { .. } => {
                ApiError::new(ErrorCode::InvalidTransition, message)
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TemplateNotFound(id) => ApiError::not_found("Template", &id),
            CoreError::InvalidQuantity { .. } => {
                ApiError::new(ErrorCode::ValidationError, err.to_string())
            }
            CoreError::Checkout(e) => e.into(),
            CoreError::Validation(e) => {
                let message = e.to_string();
                ApiError::validation(message, vec![e])
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        CoreError::from(err).into()
    }
}

/// Converts gateway errors to API errors.
impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Rejected(_) => ApiError::new(ErrorCode::GatewayError, err.to_string()),
            GatewayError::Unavailable(ref e) => {
                // Log the real cause but keep the customer message generic
                tracing::error!("Order service unavailable: {}", e);
                ApiError::new(
                    ErrorCode::GatewayError,
                    "Order service is unavailable, please try again",
                )
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for commands.
pub type ApiResult<T> = Result<T, ApiError>;
