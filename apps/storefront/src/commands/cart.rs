//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Category page "Add to cart" ──► add_to_cart(template_id)               │
//! │                                        │ catalog lookup, qty + 1        │
//! │                                        ▼                                │
//! │  Cart page ± buttons ───────────► update_cart_item(id, qty)             │
//! │  Cart page quantity box ────────► update_cart_item_input(id, "text")    │
//! │  Trash icon ────────────────────► remove_from_cart(id)                  │
//! │  "Clear cart" ──────────────────► clear_cart()                          │
//! │                                                                         │
//! │  Every command answers with the whole cart, so the UI never has to      │
//! │  patch its own copy.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use keytowish_core::validation::parse_quantity;
use keytowish_core::CartSnapshot;
use serde::Serialize;
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::ApiResult;
use crate::state::{CartState, CatalogState, StorefrontConfig};

/// Cart contents plus the display-formatted subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    #[serde(flatten)]
    pub cart: CartSnapshot,
    pub formatted_subtotal: String,
}

impl CartResponse {
    fn new(cart: CartSnapshot, config: &StorefrontConfig) -> Self {
        CartResponse {
            formatted_subtotal: config.format_currency(cart.subtotal.cents()),
            cart,
        }
    }
}

fn respond(cart: &CartState, config: &StorefrontConfig) -> CartResponse {
    CartResponse::new(cart.with_cart(|c| c.snapshot()), config)
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState, config: &StorefrontConfig) -> CartResponse {
    debug!("get_cart command");
    respond(cart, config)
}

/// Adds one of a catalog template to the cart.
///
/// ## Behavior
/// - Already in cart: quantity + 1
/// - Not in cart: appended with quantity 1
///
/// ## Errors
/// `NOT_FOUND` when the id is not in the catalog.
pub fn add_to_cart(
    catalog: &CatalogState,
    cart: &CartState,
    config: &StorefrontConfig,
    template_id: &str,
) -> ApiResult<CartResponse> {
    debug!(template_id = %template_id, "add_to_cart command");

    let candidate = catalog.candidate(template_id)?;
    let snapshot = cart.with_cart_mut(|c| {
        c.add_item(candidate);
        c.snapshot()
    });

    Ok(CartResponse::new(snapshot, config))
}

/// Sets the quantity of a cart line (the ± buttons).
///
/// ## Behavior
/// - Quantity 0 or less: removes the item
/// - Unknown id: no change
pub fn update_cart_item(
    cart: &CartState,
    config: &StorefrontConfig,
    id: &str,
    quantity: i64,
) -> CartResponse {
    debug!(id = %id, quantity, "update_cart_item command");
    let snapshot = cart.with_cart_mut(|c| {
        c.set_quantity(id, quantity);
        c.snapshot()
    });
    CartResponse::new(snapshot, config)
}

/// Applies what was typed into the quantity box.
///
/// Text that is not a whole number, or is zero or less, is ignored and the
/// cart comes back unchanged; removing goes through the buttons.
pub fn update_cart_item_input(
    cart: &CartState,
    config: &StorefrontConfig,
    id: &str,
    raw: &str,
) -> CartResponse {
    debug!(id = %id, raw = %raw, "update_cart_item_input command");

    match parse_quantity(raw) {
        Ok(quantity) if quantity > 0 => update_cart_item(cart, config, id, quantity),
        Ok(quantity) => {
            debug!(id = %id, quantity, "ignoring non-positive typed quantity");
            respond(cart, config)
        }
        Err(e) => {
            warn!(id = %id, error = %e, "ignoring quantity input");
            respond(cart, config)
        }
    }
}

/// Removes a line from the cart. Unknown ids are a no-op.
pub fn remove_from_cart(cart: &CartState, config: &StorefrontConfig, id: &str) -> CartResponse {
    debug!(id = %id, "remove_from_cart command");
    let snapshot = cart.with_cart_mut(|c| {
        c.remove_item(id);
        c.snapshot()
    });
    CartResponse::new(snapshot, config)
}

/// Empties the cart.
pub fn clear_cart(cart: &CartState, config: &StorefrontConfig) -> CartResponse {
    debug!("clear_cart command");
    let snapshot = cart.with_cart_mut(|c| {
        c.clear();
        c.snapshot()
    });
    CartResponse::new(snapshot, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn setup() -> (CatalogState, CartState, StorefrontConfig) {
        (
            CatalogState::seeded().unwrap(),
            CartState::new(),
            StorefrontConfig::default(),
        )
    }

    #[test]
    fn test_add_twice_then_totals() {
        let (catalog, cart, config) = setup();
        add_to_cart(&catalog, &cart, &config, "b1").unwrap();
        let response = add_to_cart(&catalog, &cart, &config, "b1").unwrap();

        assert_eq!(response.cart.items.len(), 1);
        assert_eq!(response.cart.items[0].quantity, 2);
        assert_eq!(response.cart.item_count, 2);
        assert_eq!(response.formatted_subtotal, "$9.98");
    }

    #[test]
    fn test_add_unknown_template() {
        let (catalog, cart, config) = setup();
        let err = add_to_cart(&catalog, &cart, &config, "zz9").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(get_cart(&cart, &config).cart.is_empty());
    }

    #[test]
    fn test_typed_quantity() {
        let (catalog, cart, config) = setup();
        add_to_cart(&catalog, &cart, &config, "a3").unwrap();

        let response = update_cart_item_input(&cart, &config, "a3", " 4 ");
        assert_eq!(response.cart.item_count, 4);

        // ignored input leaves the line alone
        for raw in ["abc", "", "0", "-2", "2.5"] {
            let response = update_cart_item_input(&cart, &config, "a3", raw);
            assert_eq!(response.cart.item_count, 4, "input {raw:?}");
        }
    }

    #[test]
    fn test_buttons_can_remove() {
        let (catalog, cart, config) = setup();
        add_to_cart(&catalog, &cart, &config, "b2").unwrap();
        let response = update_cart_item(&cart, &config, "b2", 0);
        assert!(response.cart.is_empty());
        assert_eq!(response.formatted_subtotal, "$0.00");
    }

    #[test]
    fn test_remove_and_clear() {
        let (catalog, cart, config) = setup();
        add_to_cart(&catalog, &cart, &config, "b1").unwrap();
        add_to_cart(&catalog, &cart, &config, "a1").unwrap();

        let response = remove_from_cart(&cart, &config, "b1");
        assert_eq!(response.cart.items.len(), 1);
        assert_eq!(response.cart.items[0].id, "a1");

        assert!(clear_cart(&cart, &config).cart.is_empty());
    }

    #[test]
    fn test_response_shape() {
        let (catalog, cart, config) = setup();
        let response = add_to_cart(&catalog, &cart, &config, "b1").unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["itemCount"], 1);
        assert_eq!(json["subtotal"], 499);
        assert_eq!(json["formattedSubtotal"], "$4.99");
        assert_eq!(json["items"][0]["unitPrice"], 499);
    }
}
