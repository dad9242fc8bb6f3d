//! # Wish-Card Commands
//!
//! ```text
//! Order form ──► create_wish(request)
//!                   ├── recipient / occasion / custom key checked together
//!                   ├── key: custom, or generated demo-xxxxx
//!                   └── share URL + rendered preview
//!
//! Wish page  ──► render_wish(template, recipient, occasion)
//! ```

use keytowish_core::validation::validate_required;
use keytowish_core::{PlacedWish, RenderedWish, WishOrderRequest, WishTemplate};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::StorefrontConfig;

/// Validates a wish-card order and hands back its share link.
///
/// ## Errors
/// `VALIDATION_ERROR` listing every bad field.
pub fn create_wish(config: &StorefrontConfig, request: WishOrderRequest) -> ApiResult<PlacedWish> {
    debug!(
        occasion = %request.occasion,
        custom_key = request.custom_key().is_some(),
        "create_wish command"
    );

    match request.place(&config.share_base_url) {
        Ok(placed) => {
            info!(key = %placed.key, occasion = %placed.occasion, "wish created");
            Ok(placed)
        }
        Err(fields) => {
            warn!(fields = fields.len(), "wish order rejected");
            Err(ApiError::validation("Please fix the highlighted fields", fields))
        }
    }
}

/// Renders a wish page's text.
///
/// An unknown template name renders as Birthday.
pub fn render_wish(template: &str, recipient: &str, occasion: &str) -> ApiResult<RenderedWish> {
    debug!(template = %template, "render_wish command");

    let missing: Vec<_> = [("recipient", recipient), ("occasion", occasion)]
        .into_iter()
        .filter_map(|(field, value)| validate_required(field, value).err())
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::validation("Missing required fields", missing));
    }

    Ok(WishTemplate::resolve(template).render(occasion, recipient))
}
