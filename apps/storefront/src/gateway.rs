//! # Order Gateway
//!
//! The boundary to the order-submission service. Checkout only moves from
//! Review to Complete after the gateway accepts the order.
//!
//! ```text
//! place_order
//!     │
//!     ├── session.step() == Review?  no ──► INVALID_TRANSITION
//!     │
//!     ├── gateway.submit(OrderSubmission) ──► Err ──► GATEWAY_ERROR
//!     │                                              (session stays on Review,
//!     │                                               cart untouched)
//!     ▼
//! session.complete_with(cart, receipt.reference, receipt.accepted_at)
//! ```
//!
//! [`SimulatedGateway`] stands in for the real service: it waits a fixed
//! latency and accepts everything.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use keytowish_core::{
    CheckoutSession, LineItem, OrderReference, OrderTotals, PaymentSelection, ShippingInfo,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

// =============================================================================
// Types
// =============================================================================

/// What is sent to the order service: who and where to ship, how to charge,
/// how much, and what.
///
/// `Debug` masks card data through [`PaymentSelection`]'s own impl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub shipping: ShippingInfo,
    pub payment: PaymentSelection,
    pub totals: OrderTotals,
    pub items: Vec<LineItem>,
}

impl OrderSubmission {
    /// Builds the submission from a session on the Review step.
    ///
    /// Returns `None` until totals exist.
    pub fn from_session(session: &CheckoutSession) -> Option<Self> {
        let totals = *session.totals()?;
        Some(OrderSubmission {
            shipping: session.shipping().clone(),
            payment: session.payment().clone(),
            totals,
            items: session.cart().items.clone(),
        })
    }

    /// Where the confirmation goes.
    pub fn email(&self) -> &str {
        self.shipping.email.trim()
    }
}

/// The service's acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub reference: OrderReference,
    pub accepted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The service refused this order.
    #[error("Order rejected: {0}")]
    Rejected(String),

    /// The service could not be reached.
    #[error("Order service unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Gateway Trait
// =============================================================================

#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submits an order; on success the order is placed.
    async fn submit(&self, order: &OrderSubmission) -> Result<OrderReceipt, GatewayError>;
}

// =============================================================================
// Simulated Gateway
// =============================================================================

/// Accepts every order after `latency`.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    latency: Duration,
}

impl SimulatedGateway {
    pub fn new(latency: Duration) -> Self {
        SimulatedGateway { latency }
    }
}

#[async_trait]
impl OrderGateway for SimulatedGateway {
    async fn submit(&self, order: &OrderSubmission) -> Result<OrderReceipt, GatewayError> {
        debug!(
            email = %order.email(),
            items = order.items.len(),
            total = %order.totals.grand_total,
            method = order.payment.method_name(),
            "submitting order"
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        Ok(OrderReceipt {
            reference: OrderReference::generate(),
            accepted_at: Utc::now(),
        })
    }
}
