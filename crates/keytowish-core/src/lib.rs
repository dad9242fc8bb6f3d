//! # keytowish-core: Pure Business Logic for the KeyToWish Storefront
//!
//! Cart math, the checkout step machine and wish-card rules, as plain
//! functions over owned data. No I/O, no async, no clocks except where a
//! caller asks for "now".
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     KeyToWish Storefront                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    Frontend (Next.js)                           │    │
//! │  │   Categories ──► Cart page ──► Checkout stepper ──► Wish page   │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │ JSON commands                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    apps/storefront                              │    │
//! │  │   add_to_cart, advance_checkout, place_order, create_wish, ...  │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │             ★ keytowish-core (THIS CRATE) ★                     │    │
//! │  │                                                                 │    │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐   │    │
//! │  │   │  money  │ │  cart   │ │ checkout │ │ payment │ │  wish  │   │    │
//! │  │   │  Money  │ │CartStore│ │ Session  │ │Selection│ │ keys,  │   │    │
//! │  │   │  tax    │ │ totals  │ │  steps   │ │ summary │ │template│   │    │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └─────────┘ └────────┘   │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in integer cents, tax rounding, "$4.99" parsing
//! - [`types`] - TaxRate, Occasion, TemplateCandidate, LineItem
//! - [`cart`] - The cart aggregation engine
//! - [`payment`] - Payment method selection and its review summary
//! - [`checkout`] - Shipping → Payment → Review → Complete
//! - [`validation`] - Step gates and input rules
//! - [`templates`] - Wish page templates
//! - [`wish`] - Wish-card orders and share keys
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use keytowish_core::cart::CartStore;
//! use keytowish_core::checkout::OrderTotals;
//! use keytowish_core::money::Money;
//! use keytowish_core::types::{TaxRate, TemplateCandidate};
//!
//! let balloons = TemplateCandidate {
//!     id: "b1".to_string(),
//!     name: "Birthday Balloons".to_string(),
//!     unit_price: "$4.99".parse::<Money>().unwrap(),
//!     image_ref: "balloons.jpg".to_string(),
//!     category: Some("Birthday".to_string()),
//! };
//!
//! let mut cart = CartStore::new();
//! cart.add_item(balloons.clone());
//! cart.add_item(balloons);
//!
//! let totals = OrderTotals::compute(cart.subtotal(), TaxRate::default());
//! assert_eq!(totals.subtotal.to_string(), "$9.98");
//! assert_eq!(totals.tax_amount.to_string(), "$1.00");
//! assert_eq!(totals.grand_total.to_string(), "$10.98");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod payment;
pub mod templates;
pub mod types;
pub mod validation;
pub mod wish;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartAction, CartSnapshot, CartStore};
pub use checkout::{
    CheckoutAction, CheckoutPolicy, CheckoutSession, CheckoutStep, OrderConfirmation,
    OrderReference, OrderTotals, ShippingInfo,
};
pub use error::{CheckoutError, CoreError, ValidationError};
pub use money::Money;
pub use payment::{CardDetails, PaymentSelection, UpiApp};
pub use templates::{RenderedWish, WishTemplate};
pub use types::*;
pub use wish::{PlacedWish, WishOrderRequest};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat sales tax applied at Review: 1000 bps = 10%.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1000;

/// Pre-filled shipping country.
pub const DEFAULT_COUNTRY: &str = "United States";

/// Days from order placement to the estimated delivery date.
pub const DEFAULT_DELIVERY_DAYS: u32 = 7;

/// Leading letters of every order reference.
pub const ORDER_REFERENCE_PREFIX: &str = "KW";
