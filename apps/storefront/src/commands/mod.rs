//! # Commands Module
//!
//! All commands exposed to the frontend.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (Command enum + dispatch)
//! ├── catalog.rs   ◄─── Occasions and templates
//! ├── cart.rs      ◄─── Cart manipulation
//! ├── checkout.rs  ◄─── Checkout steps and order placement
//! ├── wish.rs      ◄─── Wish-card orders and rendering
//! └── config.rs    ◄─── Store info
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {"requestId":7,"command":"addToCart","templateId":"b1"}                │
//! │         │ serde (internally tagged on "command")                        │
//! │         ▼                                                               │
//! │  Command::AddToCart { template_id }                                     │
//! │         │ dispatch()                                                    │
//! │         ▼                                                               │
//! │  cart::add_to_cart(&catalog, &cart, &config, "b1")                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  {"requestId":7,"ok":true,"data":{...}}                                 │
//! │  {"requestId":7,"ok":false,"error":{...}}                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command function takes only the state it needs; [`dispatch`] picks
//! those pieces out of [`AppState`].

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod wish;

use keytowish_core::{PaymentSelection, ShippingInfo, WishOrderRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Every command the frontend can send.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    GetStoreInfo,
    ListCategories,
    ListTemplates {
        #[serde(default)]
        occasion: Option<String>,
    },

    GetCart,
    AddToCart {
        template_id: String,
    },
    UpdateCartItem {
        id: String,
        quantity: i64,
    },
    UpdateCartItemInput {
        id: String,
        value: String,
    },
    RemoveFromCart {
        id: String,
    },
    ClearCart,

    BeginCheckout,
    GetCheckout,
    UpdateShipping {
        shipping: ShippingInfo,
    },
    SelectPayment {
        payment: PaymentSelection,
    },
    AdvanceCheckout,
    CheckoutBack,
    PlaceOrder,
    CancelCheckout,

    CreateWish {
        request: WishOrderRequest,
    },
    RenderWish {
        #[serde(default)]
        template: String,
        recipient: String,
        occasion: String,
    },
}

impl Command {
    /// Name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetStoreInfo => "getStoreInfo",
            Command::ListCategories => "listCategories",
            Command::ListTemplates { .. } => "listTemplates",
            Command::GetCart => "getCart",
            Command::AddToCart { .. } => "addToCart",
            Command::UpdateCartItem { .. } => "updateCartItem",
            Command::UpdateCartItemInput { .. } => "updateCartItemInput",
            Command::RemoveFromCart { .. } => "removeFromCart",
            Command::ClearCart => "clearCart",
            Command::BeginCheckout => "beginCheckout",
            Command::GetCheckout => "getCheckout",
            Command::UpdateShipping { .. } => "updateShipping",
            Command::SelectPayment { .. } => "selectPayment",
            Command::AdvanceCheckout => "advanceCheckout",
            Command::CheckoutBack => "checkoutBack",
            Command::PlaceOrder => "placeOrder",
            Command::CancelCheckout => "cancelCheckout",
            Command::CreateWish { .. } => "createWish",
            Command::RenderWish { .. } => "renderWish",
        }
    }
}

/// One line of input: a command with an optional correlation id.
///
/// The id travels as `requestId` since several commands carry an item `id`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default)]
    pub request_id: Option<Value>,
    #[serde(flatten)]
    pub command: Command,
}

/// One line of output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Value>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    pub fn from_result(request_id: Option<Value>, result: ApiResult<Value>) -> Self {
        match result {
            Ok(data) => Response {
                request_id,
                ok: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Response {
                request_id,
                ok: false,
                data: None,
                error: Some(error),
            },
        }
    }
}

fn to_json<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::internal(format!("Failed to encode response: {}", e)))
}

/// Runs one command against the application state.
pub async fn dispatch(state: &AppState, command: Command) -> ApiResult<Value> {
    let AppState {
        cart: cart_state,
        checkout: checkout_state,
        catalog,
        config: store_config,
        gateway,
    } = state;

    match command {
        Command::GetStoreInfo => to_json(config::get_store_info(store_config)),
        Command::ListCategories => to_json(catalog::list_categories(catalog)),
        Command::ListTemplates { occasion } => {
            to_json(catalog::list_templates(catalog, occasion.as_deref())?)
        }

        Command::GetCart => to_json(cart::get_cart(cart_state, store_config)),
        Command::AddToCart { template_id } => to_json(cart::add_to_cart(
            catalog,
            cart_state,
            store_config,
            &template_id,
        )?),
        Command::UpdateCartItem { id, quantity } => {
            to_json(cart::update_cart_item(cart_state, store_config, &id, quantity))
        }
        Command::UpdateCartItemInput { id, value } => to_json(cart::update_cart_item_input(
            cart_state,
            store_config,
            &id,
            &value,
        )),
        Command::RemoveFromCart { id } => {
            to_json(cart::remove_from_cart(cart_state, store_config, &id))
        }
        Command::ClearCart => to_json(cart::clear_cart(cart_state, store_config)),

        Command::BeginCheckout => to_json(checkout::begin_checkout(
            cart_state,
            checkout_state,
            store_config,
        )?),
        Command::GetCheckout => to_json(checkout::get_checkout(checkout_state, store_config)?),
        Command::UpdateShipping { shipping } => to_json(checkout::update_shipping(
            checkout_state,
            store_config,
            shipping,
        )?),
        Command::SelectPayment { payment } => to_json(checkout::select_payment(
            checkout_state,
            store_config,
            payment,
        )?),
        Command::AdvanceCheckout => {
            to_json(checkout::advance_checkout(checkout_state, store_config)?)
        }
        Command::CheckoutBack => to_json(checkout::checkout_back(checkout_state, store_config)?),
        Command::PlaceOrder => to_json(
            checkout::place_order(cart_state, checkout_state, store_config, gateway.as_ref())
                .await?,
        ),
        Command::CancelCheckout => to_json(serde_json::json!({
            "cancelled": checkout::cancel_checkout(checkout_state)?
        })),

        Command::CreateWish { request } => to_json(wish::create_wish(store_config, request)?),
        Command::RenderWish {
            template,
            recipient,
            occasion,
        } => to_json(wish::render_wish(&template, &recipient, &occasion)?),
    }
}
