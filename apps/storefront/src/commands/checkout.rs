//! # Checkout Commands
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Proceed to checkout" ──► begin_checkout      (freezes the cart)       │
//! │                                                                         │
//! │  Shipping form ──────────► update_shipping ──► advance_checkout         │
//! │  Payment form  ──────────► select_payment  ──► advance_checkout         │
//! │  "Back" ─────────────────► checkout_back                                │
//! │                                                                         │
//! │  Review, "Place order" ──► place_order                                  │
//! │                              ├── gateway.submit (async, no locks held)  │
//! │                              └── session.complete_with → cart cleared   │
//! │                                                                         │
//! │  Leaving the page ───────► cancel_checkout                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use keytowish_core::{
    CheckoutError, CheckoutSession, CheckoutStep, OrderConfirmation, PaymentSelection,
    ShippingInfo,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{ApiError, ApiResult};
use crate::gateway::{OrderGateway, OrderSubmission};
use crate::state::{CartState, CheckoutState, StorefrontConfig};

/// The session plus what the stepper and review panel display.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    #[serde(flatten)]
    pub session: CheckoutSession,
    pub step_index: usize,
    pub step_label: String,
    pub payment_summary: String,
    /// Present from Review on.
    pub formatted_grand_total: Option<String>,
}

impl CheckoutResponse {
    fn new(session: CheckoutSession, config: &StorefrontConfig) -> Self {
        let step = session.step();
        CheckoutResponse {
            step_index: step.index(),
            step_label: step.label().to_string(),
            payment_summary: session.payment().summary(),
            formatted_grand_total: session
                .totals()
                .map(|t| config.format_currency(t.grand_total.cents())),
            session,
        }
    }
}

/// Confirmation plus formatted money for the confirmation page.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    #[serde(flatten)]
    pub confirmation: OrderConfirmation,
    pub formatted_grand_total: String,
    pub support_email: String,
}

/// Starts checkout over the current cart contents.
///
/// Any session already open is replaced.
///
/// ## Errors
/// - `EMPTY_CART` when the cart has no items
/// - `ORDER_IN_PROGRESS` while the open session's order is being placed
pub fn begin_checkout(
    cart: &CartState,
    checkout: &CheckoutState,
    config: &StorefrontConfig,
) -> ApiResult<CheckoutResponse> {
    debug!("begin_checkout command");

    let snapshot = cart.with_cart(|c| c.snapshot());
    let session = CheckoutSession::begin_with_policy(snapshot, config.checkout_policy())?;

    info!(
        items = session.cart().item_count,
        subtotal = %session.cart().subtotal,
        "checkout started"
    );
    checkout.start(session.clone())?;
    Ok(CheckoutResponse::new(session, config))
}

/// The open session.
pub fn get_checkout(
    checkout: &CheckoutState,
    config: &StorefrontConfig,
) -> ApiResult<CheckoutResponse> {
    debug!("get_checkout command");
    let session = checkout.current().ok_or_else(ApiError::no_checkout)?;
    Ok(CheckoutResponse::new(session, config))
}

/// Saves the shipping form.
pub fn update_shipping(
    checkout: &CheckoutState,
    config: &StorefrontConfig,
    info: ShippingInfo,
) -> ApiResult<CheckoutResponse> {
    debug!(save_info = info.save_info, "update_shipping command");
    checkout.with_session_mut(|s| {
        s.update_shipping(info)?;
        Ok(CheckoutResponse::new(s.clone(), config))
    })
}

/// Saves the payment form.
pub fn select_payment(
    checkout: &CheckoutState,
    config: &StorefrontConfig,
    payment: PaymentSelection,
) -> ApiResult<CheckoutResponse> {
    debug!(method = payment.method_name(), "select_payment command");
    checkout.with_session_mut(|s| {
        s.select_payment(payment)?;
        Ok(CheckoutResponse::new(s.clone(), config))
    })
}

/// "Next": runs the current step's gate and moves forward.
///
/// ## Errors
/// `STEP_INCOMPLETE` with every failing field; the session stays put.
pub fn advance_checkout(
    checkout: &CheckoutState,
    config: &StorefrontConfig,
) -> ApiResult<CheckoutResponse> {
    debug!("advance_checkout command");
    checkout.with_session_mut(|s| {
        let from = s.step();
        match s.advance() {
            Ok(to) => {
                if to != from {
                    info!(%from, %to, "checkout advanced");
                }
                Ok(CheckoutResponse::new(s.clone(), config))
            }
            Err(e) => {
                warn!(step = %from, error = %e, "checkout gate failed");
                Err(e.into())
            }
        }
    })
}

/// "Back": one step toward Shipping.
pub fn checkout_back(
    checkout: &CheckoutState,
    config: &StorefrontConfig,
) -> ApiResult<CheckoutResponse> {
    debug!("checkout_back command");
    checkout.with_session_mut(|s| {
        s.back();
        Ok(CheckoutResponse::new(s.clone(), config))
    })
}

/// Places the order.
///
/// ## Sequence
/// 1. Freeze the open session (no lock is held across the gateway call, but
///    the session refuses changes until this command is done)
/// 2. Refuse unless it is on Review
/// 3. Submit through the gateway; on failure nothing changes
/// 4. Complete the frozen session with the gateway's reference, which
///    empties the cart
///
/// ## Errors
/// - `NO_CHECKOUT`, `ORDER_IN_PROGRESS`, `INVALID_TRANSITION` before anything
///   is sent
/// - `GATEWAY_ERROR` when the service fails; the customer can retry
pub async fn place_order(
    cart: &CartState,
    checkout: &CheckoutState,
    config: &StorefrontConfig,
    gateway: &dyn OrderGateway,
) -> ApiResult<PlaceOrderResponse> {
    debug!("place_order command");

    let pending = checkout.begin_submission()?;
    let step = pending.session().step();
    let submission = match OrderSubmission::from_session(pending.session()) {
        Some(submission) if step == CheckoutStep::Review => submission,
        _ => {
            return Err(CheckoutError::InvalidTransition {
                from: step,
                action: "complete the order",
            }
            .into())
        }
    };

    let receipt = gateway.submit(&submission).await.map_err(|e| {
        warn!(error = %e, "order submission failed");
        ApiError::from(e)
    })?;

    let confirmation = pending.finish(|s| {
        cart.with_cart_mut(|c| s.complete_with(c, receipt.reference, receipt.accepted_at))
            .map_err(ApiError::from)
    })?;

    info!(
        reference = %confirmation.reference,
        total = %confirmation.totals.grand_total,
        "order placed"
    );

    Ok(PlaceOrderResponse {
        formatted_grand_total: config.format_currency(confirmation.totals.grand_total.cents()),
        support_email: config.support_email.clone(),
        confirmation,
    })
}

/// Abandons the open session. The cart is untouched.
///
/// ## Errors
/// `ORDER_IN_PROGRESS` while the order is being placed.
pub fn cancel_checkout(checkout: &CheckoutState) -> ApiResult<bool> {
    debug!("cancel_checkout command");
    let cancelled = checkout.cancel()?;
    if cancelled {
        info!("checkout cancelled");
    }
    Ok(cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::add_to_cart;
    use crate::error::ErrorCode;
    use crate::gateway::{GatewayError, OrderReceipt, SimulatedGateway};
    use crate::state::CatalogState;
    use async_trait::async_trait;
    use keytowish_core::CardDetails;
    use std::time::Duration;

    struct DownGateway;

    #[async_trait]
    impl OrderGateway for DownGateway {
        async fn submit(&self, _order: &OrderSubmission) -> Result<OrderReceipt, GatewayError> {
            Err(GatewayError::Unavailable("connection refused".to_string()))
        }
    }

    fn shipping() -> ShippingInfo {
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

    fn card() -> PaymentSelection {
        PaymentSelection::CreditCard(CardDetails {
            card_number: "1234 5678 9012 3456".to_string(),
            name_on_card: "Ada Lovelace".to_string(),
            expiry: "12/29".to_string(),
            cvv: "123".to_string(),
        })
    }

    fn setup() -> (CartState, CheckoutState, StorefrontConfig) {
        let catalog = CatalogState::seeded().unwrap();
        let cart = CartState::new();
        let config = StorefrontConfig::default();
        add_to_cart(&catalog, &cart, &config, "b1").unwrap();
        add_to_cart(&catalog, &cart, &config, "b1").unwrap();
        (cart, CheckoutState::new(), config)
    }

    fn to_review(cart: &CartState, checkout: &CheckoutState, config: &StorefrontConfig) {
        begin_checkout(cart, checkout, config).unwrap();
        update_shipping(checkout, config, shipping()).unwrap();
        advance_checkout(checkout, config).unwrap();
        select_payment(checkout, config, card()).unwrap();
        advance_checkout(checkout, config).unwrap();
    }

    #[test]
    fn test_begin_with_empty_cart() {
        let err = begin_checkout(&CartState::new(), &CheckoutState::new(), &StorefrontConfig::default())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
    }

    #[test]
    fn test_commands_need_a_session() {
        let checkout = CheckoutState::new();
        let config = StorefrontConfig::default();
        assert_eq!(get_checkout(&checkout, &config).unwrap_err().code, ErrorCode::NoCheckout);
        assert_eq!(
            advance_checkout(&checkout, &config).unwrap_err().code,
            ErrorCode::NoCheckout
        );
        assert!(!cancel_checkout(&checkout).unwrap());
    }

    #[test]
    fn test_gate_failure_reports_fields() {
        let (cart, checkout, config) = setup();
        begin_checkout(&cart, &checkout, &config).unwrap();

        let err = advance_checkout(&checkout, &config).unwrap_err();
        assert_eq!(err.code, ErrorCode::StepIncomplete);
        assert_eq!(err.fields.len(), 8);
        assert_eq!(get_checkout(&checkout, &config).unwrap().step_index, 0);
    }

    #[test]
    fn test_review_shows_totals() {
        let (cart, checkout, config) = setup();
        to_review(&cart, &checkout, &config);

        let response = get_checkout(&checkout, &config).unwrap();
        assert_eq!(response.session.step(), CheckoutStep::Review);
        assert_eq!(response.step_label, "Review & Complete");
        assert_eq!(response.payment_summary, "Credit Card ending in 3456");
        assert_eq!(response.formatted_grand_total.as_deref(), Some("$10.98"));

        let back = checkout_back(&checkout, &config).unwrap();
        assert_eq!(back.session.step(), CheckoutStep::Payment);
        assert!(back.formatted_grand_total.is_none());
    }

    #[tokio::test]
    async fn test_place_order_completes_and_clears_cart() {
        let (cart, checkout, config) = setup();
        to_review(&cart, &checkout, &config);

        let gateway = SimulatedGateway::new(Duration::ZERO);
        let response = place_order(&cart, &checkout, &config, &gateway).await.unwrap();

        assert_eq!(response.formatted_grand_total, "$10.98");
        assert_eq!(response.confirmation.totals.tax_amount.cents(), 100);
        assert_eq!(response.support_email, "support@keytowish.com");
        assert!(cart.with_cart(|c| c.is_empty()));

        let session = get_checkout(&checkout, &config).unwrap();
        assert_eq!(session.session.step(), CheckoutStep::Complete);
        assert_eq!(
            session.session.order_reference(),
            Some(&response.confirmation.reference)
        );
    }

    #[tokio::test]
    async fn test_place_order_before_review() {
        let (cart, checkout, config) = setup();
        begin_checkout(&cart, &checkout, &config).unwrap();

        let gateway = SimulatedGateway::new(Duration::ZERO);
        let err = place_order(&cart, &checkout, &config, &gateway).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
        assert_eq!(cart.with_cart(|c| c.item_count()), 2);
    }

    #[tokio::test]
    async fn test_gateway_failure_keeps_review_and_cart() {
        let (cart, checkout, config) = setup();
        to_review(&cart, &checkout, &config);

        let err = place_order(&cart, &checkout, &config, &DownGateway).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::GatewayError);
        assert_eq!(cart.with_cart(|c| c.item_count()), 2);
        assert_eq!(
            get_checkout(&checkout, &config).unwrap().session.step(),
            CheckoutStep::Review
        );
    }

    struct HeldGateway {
        release: tokio::sync::Notify,
    }

    #[async_trait]
    impl OrderGateway for HeldGateway {
        async fn submit(&self, _order: &OrderSubmission) -> Result<OrderReceipt, GatewayError> {
            self.release.notified().await;
            Ok(OrderReceipt {
                reference: keytowish_core::OrderReference::new("KW0000BEEF"),
                accepted_at: chrono::Utc::now(),
            })
        }
    }

    #[tokio::test]
    async fn test_session_cannot_change_while_order_in_flight() {
        let (cart, checkout, config) = setup();
        to_review(&cart, &checkout, &config);
        let gateway = HeldGateway {
            release: tokio::sync::Notify::new(),
        };

        let placing = place_order(&cart, &checkout, &config, &gateway);
        let meddling = async {
            tokio::task::yield_now().await;
            let codes = [
                cancel_checkout(&checkout).unwrap_err().code,
                begin_checkout(&cart, &checkout, &config).unwrap_err().code,
                checkout_back(&checkout, &config).unwrap_err().code,
                select_payment(&checkout, &config, PaymentSelection::PayPal)
                    .unwrap_err()
                    .code,
            ];
            gateway.release.notify_one();
            codes
        };

        let (placed, codes) = tokio::join!(placing, meddling);

        assert_eq!(codes, [ErrorCode::OrderInProgress; 4]);
        let placed = placed.unwrap();
        assert_eq!(placed.confirmation.reference.as_str(), "KW0000BEEF");
        assert_eq!(placed.confirmation.payment_summary, "Credit Card ending in 3456");
        assert!(cart.with_cart(|c| c.is_empty()));

        let session = get_checkout(&checkout, &config).unwrap();
        assert_eq!(session.session.step(), CheckoutStep::Complete);
        assert!(cancel_checkout(&checkout).unwrap());
    }

    #[tokio::test]
    async fn test_failed_submission_unfreezes_session() {
        let (cart, checkout, config) = setup();
        to_review(&cart, &checkout, &config);

        place_order(&cart, &checkout, &config, &DownGateway).await.unwrap_err();

        let back = checkout_back(&checkout, &config).unwrap();
        assert_eq!(back.session.step(), CheckoutStep::Payment);
    }

    #[test]
    fn test_cart_edits_after_begin_do_not_leak() {
        let (cart, checkout, config) = setup();
        begin_checkout(&cart, &checkout, &config).unwrap();
        cart.with_cart_mut(|c| c.clear());

        let response = get_checkout(&checkout, &config).unwrap();
        assert_eq!(response.session.cart().item_count, 2);
    }

    #[test]
    fn test_cancel() {
        let (cart, checkout, config) = setup();
        begin_checkout(&cart, &checkout, &config).unwrap();
        assert!(cancel_checkout(&checkout).unwrap());
        assert!(checkout.current().is_none());
        assert_eq!(cart.with_cart(|c| c.item_count()), 2);
    }
}
