//! # Checkout
//!
//! The checkout step state machine.
//!
//! ## Step Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  begin(cart) ── empty cart? ──► Err(EmptyCart)                          │
//! │      │                                                                  │
//! │      ▼           advance()               advance()                      │
//! │  ┌──────────┐  shipping gate  ┌─────────┐ payment gate ┌──────────┐     │
//! │  │ Shipping │ ──────────────► │ Payment │ ───────────► │  Review  │     │
//! │  └──────────┘ ◄────────────── └─────────┘ ◄─────────── └──────────┘     │
//! │                    back()                   back()          │           │
//! │                                              totals computed │          │
//! │                                              on entering ────┘          │
//! │                                                             │           │
//! │                                                  complete() │           │
//! │                                    (reference, cart.clear())▼           │
//! │                                                      ┌──────────┐       │
//! │                                                      │ Complete │       │
//! │                                                      └──────────┘       │
//! │                                              terminal: advance/back     │
//! │                                              are no-ops                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed gate returns [`CheckoutError::StepGateFailed`] listing every bad
//! field and leaves the session untouched, so nothing the customer typed is
//! lost.
//!
//! The session works on a copy of the cart taken at [`CheckoutSession::begin`];
//! later cart edits cannot shift the totals mid-flow.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{CartSnapshot, CartStore};
use crate::error::{CheckoutError, CheckoutResult};
use crate::money::Money;
use crate::payment::PaymentSelection;
use crate::types::{LineItem, TaxRate};
use crate::validation::{payment_errors, shipping_errors};

// =============================================================================
// Checkout Step
// =============================================================================

/// Position in the checkout sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Payment,
    Review,
    Complete,
}

impl CheckoutStep {
    /// Zero-based index, for the frontend stepper.
    pub const fn index(&self) -> usize {
        match self {
            CheckoutStep::Shipping => 0,
            CheckoutStep::Payment => 1,
            CheckoutStep::Review => 2,
            CheckoutStep::Complete => 3,
        }
    }

    /// Stepper label.
    pub const fn label(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "Shipping Information",
            CheckoutStep::Payment => "Payment Method",
            CheckoutStep::Review => "Review & Complete",
            CheckoutStep::Complete => "Order Complete",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, CheckoutStep::Complete)
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
            CheckoutStep::Complete => "Complete",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Shipping Info
// =============================================================================

/// Recipient and delivery address.
///
/// Everything except `country` and `save_info` is required by the shipping
/// gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    /// State, province or region.
    pub state: String,
    /// Zip or postal code.
    pub zip: String,
    pub country: String,
    /// "Save this information for next time". Carried, never validated.
    pub save_info: bool,
}

impl Default for ShippingInfo {
    fn default() -> Self {
        ShippingInfo {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: crate::DEFAULT_COUNTRY.to_string(),
            save_info: false,
        }
    }
}

impl ShippingInfo {
    /// "First Last", trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

// =============================================================================
// Order Totals
// =============================================================================

/// Subtotal, tax and grand total of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax_rate: TaxRate,
    pub tax_amount: Money,
    /// Always zero: cards ship free.
    pub shipping: Money,
    pub grand_total: Money,
}

impl OrderTotals {
    /// Tax is `subtotal × rate` rounded to the cent; shipping is free.
    ///
    /// ```rust
    /// use keytowish_core::checkout::OrderTotals;
    /// use keytowish_core::money::Money;
    /// use keytowish_core::types::TaxRate;
    ///
    /// let totals = OrderTotals::compute(Money::from_cents(998), TaxRate::from_bps(1000));
    /// assert_eq!(totals.tax_amount.cents(), 100);
    /// assert_eq!(totals.grand_total.cents(), 1098);
    /// ```
    pub fn compute(subtotal: Money, tax_rate: TaxRate) -> Self {
        let tax_amount = subtotal.calculate_tax(tax_rate);
        let shipping = Money::zero();
        OrderTotals {
            subtotal,
            tax_rate,
            tax_amount,
            shipping,
            grand_total: subtotal + tax_amount + shipping,
        }
    }
}

// =============================================================================
// Order Reference & Confirmation
// =============================================================================

/// Opaque order token handed out when an order completes, e.g. `KW3F9A01C2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderReference(String);

impl OrderReference {
    /// A fresh random reference: `KW` followed by 8 uppercase hex digits.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string().to_ascii_uppercase();
        OrderReference(format!("{}{}", crate::ORDER_REFERENCE_PREFIX, &hex[..8]))
    }

    /// Wraps an identifier issued elsewhere (e.g. by the order service).
    pub fn new(reference: impl Into<String>) -> Self {
        OrderReference(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The record emitted when checkout completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub reference: OrderReference,
    #[ts(as = "String")]
    pub placed_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub estimated_delivery: DateTime<Utc>,
    /// Where the confirmation email goes.
    pub email: String,
    pub recipient_name: String,
    pub items: Vec<LineItem>,
    pub totals: OrderTotals,
    pub payment_summary: String,
}

// =============================================================================
// Checkout Policy
// =============================================================================

/// Pricing knobs fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPolicy {
    pub tax_rate: TaxRate,
    pub delivery_days: u32,
}

impl Default for CheckoutPolicy {
    /// Flat 10% tax, delivery estimated a week out.
    fn default() -> Self {
        CheckoutPolicy {
            tax_rate: TaxRate::default(),
            delivery_days: crate::DEFAULT_DELIVERY_DAYS,
        }
    }
}

// =============================================================================
// Checkout Action
// =============================================================================

/// A checkout input as a value, for the pure [`CheckoutSession::apply`] form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutAction {
    UpdateShipping(ShippingInfo),
    SelectPayment(PaymentSelection),
    Advance,
    Back,
    /// Review → Complete. Emptying the live cart is the caller's job in
    /// this form; [`CheckoutSession::complete`] does both.
    Complete {
        reference: OrderReference,
        placed_at: DateTime<Utc>,
    },
}

// =============================================================================
// Checkout Session
// =============================================================================

/// One in-progress checkout attempt.
///
/// ## Editing Policy
/// Shipping and payment input are accepted while the session is on the
/// Shipping or Payment step. From Review on they are frozen, so what the
/// customer reviews is exactly what gets placed; `back()` reopens them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    step: CheckoutStep,
    cart: CartSnapshot,
    shipping: ShippingInfo,
    payment: PaymentSelection,
    policy: CheckoutPolicy,
    totals: Option<OrderTotals>,
    confirmation: Option<OrderConfirmation>,
}

impl CheckoutSession {
    /// Starts checkout over a frozen copy of `cart` with the default policy.
    ///
    /// ## Errors
    /// `EmptyCart` when `cart.item_count` is zero.
    pub fn begin(cart: CartSnapshot) -> CheckoutResult<Self> {
        Self::begin_with_policy(cart, CheckoutPolicy::default())
    }

    /// Starts checkout with an explicit tax/delivery policy.
    pub fn begin_with_policy(cart: CartSnapshot, policy: CheckoutPolicy) -> CheckoutResult<Self> {
        if cart.item_count <= 0 {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(CheckoutSession {
            step: CheckoutStep::Shipping,
            cart,
            shipping: ShippingInfo::default(),
            payment: PaymentSelection::default(),
            policy,
            totals: None,
            confirmation: None,
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The cart as it was when checkout began.
    #[inline]
    pub fn cart(&self) -> &CartSnapshot {
        &self.cart
    }

    #[inline]
    pub fn shipping(&self) -> &ShippingInfo {
        &self.shipping
    }

    #[inline]
    pub fn payment(&self) -> &PaymentSelection {
        &self.payment
    }

    #[inline]
    pub fn policy(&self) -> CheckoutPolicy {
        self.policy
    }

    /// Present on Review and Complete.
    #[inline]
    pub fn totals(&self) -> Option<&OrderTotals> {
        self.totals.as_ref()
    }

    /// Present only on Complete.
    #[inline]
    pub fn order_reference(&self) -> Option<&OrderReference> {
        self.confirmation.as_ref().map(|c| &c.reference)
    }

    #[inline]
    pub fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Replaces the shipping details.
    pub fn update_shipping(&mut self, info: ShippingInfo) -> CheckoutResult<()> {
        self.ensure_editable("Shipping information")?;
        self.shipping = info;
        Ok(())
    }

    /// Replaces the payment selection.
    pub fn select_payment(&mut self, payment: PaymentSelection) -> CheckoutResult<()> {
        self.ensure_editable("Payment method")?;
        self.payment = payment;
        Ok(())
    }

    fn ensure_editable(&self, section: &'static str) -> CheckoutResult<()> {
        match self.step {
            CheckoutStep::Shipping | CheckoutStep::Payment => Ok(()),
            step => Err(CheckoutError::NotEditable { section, step }),
        }
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Moves one step forward if the current step's gate passes.
    ///
    /// ## Behavior
    /// - Shipping → Payment when every required shipping field is filled
    /// - Payment → Review when the payment selection is complete; order
    ///   totals are computed on the way in
    /// - Review, Complete: no-op, returns the current step (Review only
    ///   leaves through [`complete`](Self::complete))
    ///
    /// ## Returns
    /// The step the session is on afterwards.
    pub fn advance(&mut self) -> CheckoutResult<CheckoutStep> {
        match self.step {
            CheckoutStep::Shipping => {
                let fields = shipping_errors(&self.shipping);
                if !fields.is_empty() {
                    return Err(CheckoutError::StepGateFailed {
                        step: self.step,
                        fields,
                    });
                }
                self.step = CheckoutStep::Payment;
            }
            CheckoutStep::Payment => {
                let fields = payment_errors(&self.payment);
                if !fields.is_empty() {
                    return Err(CheckoutError::StepGateFailed {
                        step: self.step,
                        fields,
                    });
                }
                self.totals = Some(OrderTotals::compute(self.cart.subtotal, self.policy.tax_rate));
                self.step = CheckoutStep::Review;
            }
            CheckoutStep::Review | CheckoutStep::Complete => {}
        }
        Ok(self.step)
    }

    /// Moves one step back: Payment → Shipping, Review → Payment.
    ///
    /// No-op on Shipping (nothing before it) and Complete (terminal).
    /// Returns the step the session is on afterwards.
    pub fn back(&mut self) -> CheckoutStep {
        match self.step {
            CheckoutStep::Payment => self.step = CheckoutStep::Shipping,
            CheckoutStep::Review => {
                // recomputed on the next entry into Review
                self.totals = None;
                self.step = CheckoutStep::Payment;
            }
            CheckoutStep::Shipping | CheckoutStep::Complete => {}
        }
        self.step
    }

    /// Places the order: Review → Complete, emptying `cart`.
    ///
    /// Callers submit the order to the order service first; this transition
    /// assumes that submission succeeded.
    ///
    /// ## Errors
    /// `InvalidTransition` from any step other than Review. The cart is not
    /// touched in that case.
    pub fn complete(&mut self, cart: &mut CartStore) -> CheckoutResult<OrderConfirmation> {
        self.complete_with(cart, OrderReference::generate(), Utc::now())
    }

    /// [`complete`](Self::complete) with a caller-supplied reference and time.
    pub fn complete_with(
        &mut self,
        cart: &mut CartStore,
        reference: OrderReference,
        placed_at: DateTime<Utc>,
    ) -> CheckoutResult<OrderConfirmation> {
        let confirmation = self.finish(reference, placed_at)?;
        cart.clear();
        Ok(confirmation)
    }

    fn finish(
        &mut self,
        reference: OrderReference,
        placed_at: DateTime<Utc>,
    ) -> CheckoutResult<OrderConfirmation> {
        if self.step != CheckoutStep::Review {
            return Err(CheckoutError::InvalidTransition {
                from: self.step,
                action: "complete the order",
            });
        }

        let totals = match self.totals {
            Some(totals) => totals,
            None => OrderTotals::compute(self.cart.subtotal, self.policy.tax_rate),
        };

        let confirmation = OrderConfirmation {
            reference,
            placed_at,
            estimated_delivery: placed_at + Duration::days(i64::from(self.policy.delivery_days)),
            email: self.shipping.email.trim().to_string(),
            recipient_name: self.shipping.full_name(),
            items: self.cart.items.clone(),
            totals,
            payment_summary: self.payment.summary(),
        };

        self.totals = Some(totals);
        self.confirmation = Some(confirmation.clone());
        self.step = CheckoutStep::Complete;
        Ok(confirmation)
    }

    /// Applies `action` to a copy of this session.
    ///
    /// On error the copy is dropped and `self` is unchanged, which is the
    /// same guarantee the `&mut` methods give.
    pub fn apply(&self, action: CheckoutAction) -> CheckoutResult<CheckoutSession> {
        let mut next = self.clone();
        match action {
            CheckoutAction::UpdateShipping(info) => next.update_shipping(info)?,
            CheckoutAction::SelectPayment(payment) => next.select_payment(payment)?,
            CheckoutAction::Advance => {
                next.advance()?;
            }
            CheckoutAction::Back => {
                next.back();
            }
            CheckoutAction::Complete {
                reference,
                placed_at,
            } => {
                next.finish(reference, placed_at)?;
            }
        }
        Ok(next)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
