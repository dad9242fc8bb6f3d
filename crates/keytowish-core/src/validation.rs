//! # Validation Module
//!
//! Step gates for checkout plus the small input rules around the cart and
//! wish-card orders.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Frontend form                                                 │
//! │  └── marks `required` inputs, immediate feedback                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── shipping_errors / payment_errors collect EVERY failing field       │
//! │  │   so the UI can highlight them all at once                           │
//! │  └── parse_quantity / validate_custom_key reject malformed input        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: CheckoutSession::advance                                      │
//! │  └── refuses to move while any error is reported                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A field counts as empty when it is blank after trimming whitespace.

use crate::checkout::ShippingInfo;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::payment::PaymentSelection;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Wish-card custom key length bounds.
pub const CUSTOM_KEY_MIN_LEN: usize = 3;
pub const CUSTOM_KEY_MAX_LEN: usize = 20;

// =============================================================================
// Field Helpers
// =============================================================================

/// Fails with `Required` when `value` is blank.
///
/// ```rust
/// use keytowish_core::validation::validate_required;
///
/// assert!(validate_required("city", "Pune").is_ok());
/// assert!(validate_required("city", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn collect_required(fields: &[(&str, &str)]) -> Vec<ValidationError> {
    fields
        .iter()
        .filter_map(|(field, value)| validate_required(field, value).err())
        .collect()
}

// =============================================================================
// Step Gates
// =============================================================================

/// Every missing required shipping field, in form order.
///
/// Country is not checked (it has a default), nor is `save_info`.
pub fn shipping_errors(info: &ShippingInfo) -> Vec<ValidationError> {
    collect_required(&[
        ("firstName", info.first_name.as_str()),
        ("lastName", info.last_name.as_str()),
        ("email", info.email.as_str()),
        ("phone", info.phone.as_str()),
        ("address", info.address.as_str()),
        ("city", info.city.as_str()),
        ("state", info.state.as_str()),
        ("zip", info.zip.as_str()),
    ])
}

/// Every problem with the selected payment method.
///
/// ## Rules
/// - CreditCard: card number, name on card, expiry and CVV all present
/// - UPI: an id containing `@`, or a provider app chosen
/// - BankTransfer, PayPal: always valid
pub fn payment_errors(payment: &PaymentSelection) -> Vec<ValidationError> {
    match payment {
        PaymentSelection::CreditCard(card) => collect_required(&[
            ("cardNumber", card.card_number.as_str()),
            ("nameOnCard", card.name_on_card.as_str()),
            ("expiry", card.expiry.as_str()),
            ("cvv", card.cvv.as_str()),
        ]),
        PaymentSelection::Upi { upi_id, app } => {
            if app.is_some() || upi_id.contains('@') {
                Vec::new()
            } else {
                vec![ValidationError::InvalidFormat {
                    field: "upiId".to_string(),
                    reason: "enter a UPI ID containing '@' or choose a UPI app".to_string(),
                }]
            }
        }
        PaymentSelection::BankTransfer | PaymentSelection::PayPal => Vec::new(),
    }
}

// =============================================================================
// Cart Input
// =============================================================================

/// Parses the quantity box of the cart page.
///
/// ## Rules
/// - Whole numbers only (surrounding whitespace allowed)
/// - Zero and negatives parse fine; the cart treats them as "remove"
/// - Anything else is `InvalidQuantity`, which callers ignore
///
/// ```rust
/// use keytowish_core::validation::parse_quantity;
///
/// assert_eq!(parse_quantity(" 3 ").unwrap(), 3);
/// assert_eq!(parse_quantity("0").unwrap(), 0);
/// assert!(parse_quantity("two").is_err());
/// ```
pub fn parse_quantity(raw: &str) -> CoreResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CoreError::InvalidQuantity {
            input: raw.to_string(),
        })
}

// =============================================================================
// Wish Orders
// =============================================================================

/// Validates a customer-chosen wish key.
///
/// ## Rules
/// - 3 to 20 characters
/// - ASCII letters, digits and hyphens only
///
/// ```rust
/// use keytowish_core::validation::validate_custom_key;
///
/// assert!(validate_custom_key("happy-bday-ana").is_ok());
/// assert!(validate_custom_key("ab").is_err());
/// assert!(validate_custom_key("no spaces").is_err());
/// ```
pub fn validate_custom_key(key: &str) -> ValidationResult<()> {
    let len = key.chars().count();

    if len < CUSTOM_KEY_MIN_LEN {
        return Err(ValidationError::TooShort {
            field: "customKey".to_string(),
            min: CUSTOM_KEY_MIN_LEN,
        });
    }

    if len > CUSTOM_KEY_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "customKey".to_string(),
            max: CUSTOM_KEY_MAX_LEN,
        });
    }

    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidFormat {
            field: "customKey".to_string(),
            reason: "must contain only letters, numbers, or hyphens".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{CardDetails, UpiApp};

    fn full_shipping() -> ShippingInfo {
        ShippingInfo {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "12 Analytical Way".to_string(),
            city: "London".to_string(),
            state: "LDN".to_string(),
            zip: "N1 9GU".to_string(),
            ..ShippingInfo::default()
        }
    }

    #[test]
    fn test_complete_shipping_passes() {
        assert!(shipping_errors(&full_shipping()).is_empty());
    }

    #[test]
    fn test_shipping_reports_every_missing_field() {
        let mut info = full_shipping();
        info.email.clear();
        info.zip = "   ".to_string();

        let fields: Vec<String> = shipping_errors(&info)
            .iter()
            .map(|e| e.field().to_string())
            .collect();
        assert_eq!(fields, vec!["email", "zip"]);
    }

    #[test]
    fn test_empty_country_is_fine() {
        let mut info = full_shipping();
        info.country.clear();
        assert!(shipping_errors(&info).is_empty());
    }

    #[test]
    fn test_credit_card_requires_all_four_fields() {
        let complete = CardDetails {
            card_number: "4111 1111 1111 1111".to_string(),
            name_on_card: "Ada Lovelace".to_string(),
            expiry: "12/29".to_string(),
            cvv: "123".to_string(),
        };
        assert!(payment_errors(&PaymentSelection::CreditCard(complete.clone())).is_empty());

        let missing_cvv = CardDetails {
            cvv: String::new(),
            ..complete
        };
        let errors = payment_errors(&PaymentSelection::CreditCard(missing_cvv));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "cvv");

        assert_eq!(payment_errors(&PaymentSelection::default()).len(), 4);
    }

    #[test]
    fn test_upi_needs_at_sign_or_app() {
        let id_only = PaymentSelection::Upi {
            upi_id: "ada@okbank".to_string(),
            app: None,
        };
        assert!(payment_errors(&id_only).is_empty());

        let app_only = PaymentSelection::Upi {
            upi_id: String::new(),
            app: Some(UpiApp::Paytm),
        };
        assert!(payment_errors(&app_only).is_empty());

        let neither = PaymentSelection::Upi {
            upi_id: "ada-okbank".to_string(),
            app: None,
        };
        assert_eq!(payment_errors(&neither)[0].field(), "upiId");
    }

    #[test]
    fn test_bank_transfer_and_paypal_always_pass() {
        assert!(payment_errors(&PaymentSelection::BankTransfer).is_empty());
        assert!(payment_errors(&PaymentSelection::PayPal).is_empty());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("12").unwrap(), 12);
        assert_eq!(parse_quantity("-1").unwrap(), -1);
        assert!(matches!(
            parse_quantity("1.5"),
            Err(CoreError::InvalidQuantity { .. })
        ));
        assert!(parse_quantity("").is_err());
    }

    #[test]
    fn test_custom_key_rules() {
        assert!(validate_custom_key("abc").is_ok());
        assert!(validate_custom_key("A-1-b-2").is_ok());
        assert!(validate_custom_key(&"k".repeat(20)).is_ok());

        assert!(matches!(
            validate_custom_key(&"k".repeat(21)),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(matches!(
            validate_custom_key("ab"),
            Err(ValidationError::TooShort { .. })
        ));
        assert!(matches!(
            validate_custom_key("under_score"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_custom_key("héllo").is_err());
    }
}
