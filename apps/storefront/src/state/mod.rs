//! # State Module
//!
//! Live state for the storefront, one type per concern.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────┐ ┌───────────────┐ ┌──────────────┐ ┌───────────────┐  │
//! │  │  CartState   │ │ CheckoutState │ │ CatalogState │ │    Config     │  │
//! │  │ Arc<Mutex<   │ │ Arc<Mutex<    │ │  read-only   │ │  read-only    │  │
//! │  │  CartStore>> │ │ CheckoutSlot>>│ │  templates   │ │  settings     │  │
//! │  └──────────────┘ └───────────────┘ └──────────────┘ └───────────────┘  │
//! │                                                                         │
//! │  Commands take only the pieces they need; AppState just owns them all   │
//! │  for the command loop.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod checkout;
mod config;

pub use cart::CartState;
pub use catalog::{CatalogState, CatalogTemplate, CategorySummary};
pub use checkout::{CheckoutState, Submission};
pub use config::{ConfigError, StoreInfo, StorefrontConfig, UpiAppInfo, CONFIG_PATH_ENV};

use std::sync::Arc;

use crate::gateway::{OrderGateway, SimulatedGateway};

/// Everything the command loop hands out to commands.
#[derive(Clone)]
pub struct AppState {
    pub cart: CartState,
    pub checkout: CheckoutState,
    pub catalog: Arc<CatalogState>,
    pub config: Arc<StorefrontConfig>,
    pub gateway: Arc<dyn OrderGateway>,
}

impl AppState {
    /// Empty cart, no checkout, and the simulated order service.
    pub fn new(config: StorefrontConfig, catalog: CatalogState) -> Self {
        let gateway = Arc::new(SimulatedGateway::new(config.gateway_latency()));
        AppState::with_gateway(config, catalog, gateway)
    }

    pub fn with_gateway(
        config: StorefrontConfig,
        catalog: CatalogState,
        gateway: Arc<dyn OrderGateway>,
    ) -> Self {
        AppState {
            cart: CartState::new(),
            checkout: CheckoutState::new(),
            catalog: Arc::new(catalog),
            config: Arc::new(config),
            gateway,
        }
    }
}
