//! # Wish-Card Orders
//!
//! A wish card is a shareable page for one recipient. Ordering one yields a
//! key, either the customer's own or a generated `demo-xxxxx`, and a share
//! URL built from it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::templates::{RenderedWish, WishTemplate};
use crate::types::Occasion;
use crate::validation::{validate_custom_key, validate_required};

/// Prefix of generated wish keys.
pub const GENERATED_KEY_PREFIX: &str = "demo-";

/// Random characters after the prefix.
const GENERATED_KEY_LEN: usize = 5;

// =============================================================================
// Request
// =============================================================================

/// The wish-card order form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct WishOrderRequest {
    pub recipient: String,
    pub occasion: String,
    /// Blank means "generate one".
    pub custom_key: Option<String>,
    /// Template name; resolved with a Birthday fallback.
    pub template: Option<String>,
}

impl WishOrderRequest {
    /// Every problem with the form, in field order.
    ///
    /// ## Rules
    /// - `recipient` non-blank
    /// - `occasion` names a known [`Occasion`]
    /// - `custom_key`, when non-empty, passes [`validate_custom_key`] exactly
    ///   as typed (surrounding spaces are an error)
    pub fn errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Err(e) = validate_required("recipient", &self.recipient) {
            errors.push(e);
        }

        if let Err(e) = self.occasion.parse::<Occasion>() {
            errors.push(e);
        }

        if let Some(key) = self.custom_key() {
            if let Err(e) = validate_custom_key(key) {
                errors.push(e);
            }
        }

        errors
    }

    /// The custom key, if one was typed. Not trimmed.
    pub fn custom_key(&self) -> Option<&str> {
        self.custom_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Validates the form and turns it into a placed wish.
    ///
    /// ## Errors
    /// All failing fields at once.
    pub fn place(&self, share_base_url: &str) -> Result<PlacedWish, Vec<ValidationError>> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        let occasion: Occasion = self.occasion.parse().map_err(|e| vec![e])?;
        let template = match self.template.as_deref() {
            Some(name) if !name.trim().is_empty() => WishTemplate::resolve(name),
            _ => WishTemplate::for_occasion(occasion).unwrap_or_default(),
        };

        let key = match self.custom_key() {
            Some(key) => key.to_string(),
            None => generate_key(),
        };

        Ok(PlacedWish {
            share_url: share_url(share_base_url, &key),
            preview: template.render(occasion.display_name(), &self.recipient),
            key,
            occasion,
        })
    }
}

// =============================================================================
// Placed Wish
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PlacedWish {
    pub key: String,
    pub share_url: String,
    pub occasion: Occasion,
    pub preview: RenderedWish,
}

// =============================================================================
// Keys & URLs
// =============================================================================

/// `demo-` followed by 5 random lowercase hex characters.
pub fn generate_key() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}{}", GENERATED_KEY_PREFIX, &random[..GENERATED_KEY_LEN])
}

/// Joins base and key with exactly one slash.
///
/// ```rust
/// use keytowish_core::wish::share_url;
///
/// assert_eq!(
///     share_url("https://yourdomain.com/wishes", "ana-30"),
///     "https://yourdomain.com/wishes/ana-30"
/// );
/// ```
pub fn share_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://yourdomain.com/wishes/";

    fn request() -> WishOrderRequest {
        WishOrderRequest {
            recipient: "Maya".to_string(),
            occasion: "Birthday".to_string(),
            ..WishOrderRequest::default()
        }
    }

    #[test]
    fn test_generated_key_shape() {
        let key = generate_key();
        assert!(key.starts_with("demo-"));
        assert_eq!(key.len(), 10);
        assert!(key[5..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_place_with_generated_key() {
        let placed = request().place(BASE).unwrap();
        assert!(placed.key.starts_with("demo-"));
        assert_eq!(placed.share_url, format!("https://yourdomain.com/wishes/{}", placed.key));
        assert_eq!(placed.preview.heading, "Happy Birthday, Maya!");
    }

    #[test]
    fn test_place_with_custom_key() {
        let req = WishOrderRequest {
            custom_key: Some("happy-bday-maya".to_string()),
            ..request()
        };
        let placed = req.place(BASE).unwrap();
        assert_eq!(placed.key, "happy-bday-maya");
        assert_eq!(placed.share_url, "https://yourdomain.com/wishes/happy-bday-maya");
    }

    #[test]
    fn test_empty_custom_key_is_generated() {
        let req = WishOrderRequest {
            custom_key: Some(String::new()),
            ..request()
        };
        assert!(req.errors().is_empty());
        assert!(req.place(BASE).unwrap().key.starts_with("demo-"));
    }

    #[test]
    fn test_custom_key_checked_as_typed() {
        for typed in [" abc ", "abc ", "   "] {
            let req = WishOrderRequest {
                custom_key: Some(typed.to_string()),
                ..request()
            };
            let errors = req.place(BASE).unwrap_err();
            assert_eq!(errors.len(), 1, "key {typed:?}");
            assert_eq!(errors[0].field(), "customKey");
        }
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let req = WishOrderRequest {
            recipient: String::new(),
            occasion: String::new(),
            custom_key: Some("x".to_string()),
            template: None,
        };
        let fields: Vec<String> = req.place(BASE).unwrap_err().iter().map(|e| e.field().to_string()).collect();
        assert_eq!(fields, vec!["recipient", "occasion", "customKey"]);
    }

    #[test]
    fn test_unknown_occasion_rejected() {
        let req = WishOrderRequest {
            occasion: "Halloween".to_string(),
            ..request()
        };
        assert!(matches!(
            req.errors().as_slice(),
            [ValidationError::InvalidFormat { .. }]
        ));
    }

    #[test]
    fn test_template_choice() {
        let baby = WishOrderRequest {
            occasion: "New Baby".to_string(),
            ..request()
        };
        assert_eq!(baby.place(BASE).unwrap().preview.template, WishTemplate::NewBaby);

        let named = WishOrderRequest {
            template: Some("Anniversary".to_string()),
            ..request()
        };
        assert_eq!(named.place(BASE).unwrap().preview.template, WishTemplate::Anniversary);

        let style_name = WishOrderRequest {
            occasion: "Graduation".to_string(),
            template: Some("Classic".to_string()),
            ..request()
        };
        let placed = style_name.place(BASE).unwrap();
        assert_eq!(placed.preview.template, WishTemplate::Birthday);
        assert_eq!(placed.preview.heading, "Happy Graduation, Maya!");
    }
}
