//! # Payment Selection
//!
//! What the customer chose on the Payment step. Nothing here charges money;
//! the selection is validated by the step gate and forwarded to the order
//! submission service.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PaymentSelection                     required to pass the gate         │
//! │  ├── CreditCard { number, name,  ──►  all four fields non-empty         │
//! │  │                expiry, cvv }                                         │
//! │  ├── Upi { upi_id, app }         ──►  upi_id contains '@' OR app chosen │
//! │  ├── BankTransfer                ──►  nothing                           │
//! │  └── PayPal                      ──►  nothing                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// UPI Apps
// =============================================================================

/// UPI provider apps offered as one-tap payment options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum UpiApp {
    #[serde(rename = "gpay")]
    GooglePay,
    #[serde(rename = "phonepe")]
    PhonePe,
    #[serde(rename = "paytm")]
    Paytm,
    #[serde(rename = "bhim")]
    Bhim,
    #[serde(rename = "amazonpay")]
    AmazonPay,
}

impl UpiApp {
    pub const ALL: [UpiApp; 5] = [
        UpiApp::GooglePay,
        UpiApp::PhonePe,
        UpiApp::Paytm,
        UpiApp::Bhim,
        UpiApp::AmazonPay,
    ];

    /// Stable identifier used by the frontend.
    pub const fn id(&self) -> &'static str {
        match self {
            UpiApp::GooglePay => "gpay",
            UpiApp::PhonePe => "phonepe",
            UpiApp::Paytm => "paytm",
            UpiApp::Bhim => "bhim",
            UpiApp::AmazonPay => "amazonpay",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            UpiApp::GooglePay => "Google Pay",
            UpiApp::PhonePe => "PhonePe",
            UpiApp::Paytm => "Paytm",
            UpiApp::Bhim => "BHIM",
            UpiApp::AmazonPay => "Amazon Pay",
        }
    }
}

impl fmt::Display for UpiApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for UpiApp {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        UpiApp::ALL
            .into_iter()
            .find(|app| app.id() == id)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "upiApp".to_string(),
                reason: format!("unknown UPI app '{}'", s.trim()),
            })
    }
}

// =============================================================================
// Card Details
// =============================================================================

/// Card fields as typed by the customer. Stored verbatim; only presence is
/// checked.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number: String,
    pub name_on_card: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    /// Last four digits of the card number (fewer if it is shorter).
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        let start = digits.len().saturating_sub(4);
        digits[start..].iter().collect()
    }
}

/// Keeps card numbers and CVVs out of logs.
impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &format_args!("****{}", self.last_four()))
            .field("name_on_card", &self.name_on_card)
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .finish()
    }
}

// =============================================================================
// Payment Selection
// =============================================================================

/// The payment method chosen on the Payment step, with its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum PaymentSelection {
    CreditCard(CardDetails),
    Upi {
        #[serde(default, rename = "upiId")]
        upi_id: String,
        #[serde(default)]
        app: Option<UpiApp>,
    },
    BankTransfer,
    #[serde(rename = "paypal")]
    PayPal,
}

impl Default for PaymentSelection {
    /// Credit card is preselected, with empty fields.
    fn default() -> Self {
        PaymentSelection::CreditCard(CardDetails::default())
    }
}

impl PaymentSelection {
    /// Short machine name of the variant.
    pub const fn method_name(&self) -> &'static str {
        match self {
            PaymentSelection::CreditCard(_) => "creditCard",
            PaymentSelection::Upi { .. } => "upi",
            PaymentSelection::BankTransfer => "bankTransfer",
            PaymentSelection::PayPal => "paypal",
        }
    }

    /// One-line description shown on the Review step and the confirmation.
    ///
    /// ```rust
    /// use keytowish_core::payment::{PaymentSelection, UpiApp};
    ///
    /// let upi = PaymentSelection::Upi { upi_id: String::new(), app: Some(UpiApp::PhonePe) };
    /// assert_eq!(upi.summary(), "UPI Payment via PhonePe");
    /// ```
    pub fn summary(&self) -> String {
        match self {
            PaymentSelection::CreditCard(card) => {
                format!("Credit Card ending in {}", card.last_four())
            }
            PaymentSelection::Upi { app: Some(app), .. } => format!("UPI Payment via {}", app),
            PaymentSelection::Upi { upi_id, app: None } if !upi_id.trim().is_empty() => {
                format!("UPI ID: {}", upi_id.trim())
            }
            PaymentSelection::Upi { .. } => "UPI Payment via QR Code".to_string(),
            PaymentSelection::BankTransfer => "Bank Transfer".to_string(),
            PaymentSelection::PayPal => "PayPal".to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
