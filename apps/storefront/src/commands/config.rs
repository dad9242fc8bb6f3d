//! # Config Commands

use tracing::debug;

use crate::state::{StoreInfo, StorefrontConfig};

/// Store details for the header, the UPI payment panel and the
/// confirmation page.
///
/// Only the public subset of the configuration is returned.
pub fn get_store_info(config: &StorefrontConfig) -> StoreInfo {
    debug!("get_store_info command");
    config.public_view()
}
