//! # Error Types
//!
//! Domain error types for keytowish-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  keytowish-core (this file)                                             │
//! │  ├── ValidationError  - one bad input field                             │
//! │  ├── CheckoutError    - a checkout transition that was refused          │
//! │  └── CoreError        - everything else the core can report             │
//! │                                                                         │
//! │  storefront app                                                         │
//! │  └── ApiError         - what the frontend sees (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CheckoutError / CoreError → ApiError           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in the core is fatal. Every error leaves the cart and the checkout
//! session exactly as they were, so the caller can fix the input and retry.

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use crate::checkout::CheckoutStep;

// =============================================================================
// Core Error
// =============================================================================

/// General domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Quantity input was not a number.
    ///
    /// ## When This Occurs
    /// The cart page quantity box receives "abc" or "1.5". The storefront
    /// ignores the edit and keeps the previous quantity; a numeric value of
    /// zero or less is not this error, it removes the item.
    #[error("Invalid quantity: '{input}'")]
    InvalidQuantity { input: String },

    /// A template id is not in the catalog.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Checkout transition refused.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, one per offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (UPI id without '@', bad price string, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the field this error belongs to, for field-level UI errors.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Checkout Error
// =============================================================================

/// Why a checkout session refused to start or to move.
///
/// ## User Workflow
/// ```text
/// Shipping form, "Next" clicked with an empty city
///      │
///      ▼
/// advance() → StepGateFailed { step: Shipping, fields: [city is required] }
///      │
///      ▼
/// UI marks the city field, keeps everything the user typed
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Checkout was started with nothing in the cart.
    #[error("Cannot start checkout with an empty cart")]
    EmptyCart,

    /// The current step's required fields are missing or malformed.
    #[error("{step} step is incomplete ({} field(s) need attention)", .fields.len())]
    StepGateFailed {
        step: CheckoutStep,
        fields: Vec<ValidationError>,
    },

    /// The action is not defined from the current step.
    #[error("Cannot {action} from the {from} step")]
    InvalidTransition {
        from: CheckoutStep,
        action: &'static str,
    },

    /// Input for a step that is not currently shown.
    #[error("{section} cannot be edited during the {step} step")]
    NotEditable {
        section: &'static str,
        step: CheckoutStep,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for checkout transitions.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "city".to_string(),
        };
        assert_eq!(err.to_string(), "city is required");
        assert_eq!(err.field(), "city");

        let err = ValidationError::TooShort {
            field: "customKey".to_string(),
            min: 3,
        };
        assert_eq!(err.to_string(), "customKey must be at least 3 characters");
    }

    #[test]
    fn test_every_validation_kind_names_its_field() {
        let errors = [
            ValidationError::Required {
                field: "zip".to_string(),
            },
            ValidationError::TooShort {
                field: "customKey".to_string(),
                min: 3,
            },
            ValidationError::TooLong {
                field: "customKey".to_string(),
                max: 20,
            },
            ValidationError::InvalidFormat {
                field: "upiId".to_string(),
                reason: "missing '@'".to_string(),
            },
        ];

        let fields: Vec<&str> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(fields, ["zip", "customKey", "customKey", "upiId"]);

        let kinds: Vec<String> = errors
            .iter()
            .map(|e| serde_json::to_value(e).unwrap()["kind"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, ["required", "tooShort", "tooLong", "invalidFormat"]);
    }

    #[test]
    fn test_step_gate_message_counts_fields() {
        let err = CheckoutError::StepGateFailed {
            step: CheckoutStep::Shipping,
            fields: vec![
                ValidationError::Required {
                    field: "email".to_string(),
                },
                ValidationError::Required {
                    field: "zip".to_string(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Shipping step is incomplete (2 field(s) need attention)"
        );
    }

    #[test]
    fn test_conversions_into_core_error() {
        let core: CoreError = CheckoutError::EmptyCart.into();
        assert!(matches!(core, CoreError::Checkout(CheckoutError::EmptyCart)));
        assert_eq!(core.to_string(), "Cannot start checkout with an empty cart");

        let core: CoreError = ValidationError::Required {
            field: "recipient".to_string(),
        }
        .into();
        assert!(matches!(core, CoreError::Validation(_)));
    }
}
