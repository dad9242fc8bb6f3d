//! # Wish Templates
//!
//! The closed set of wish-card page templates and the greeting each renders.
//!
//! Template names arrive as free text from the order form and stored orders.
//! [`WishTemplate::resolve`] maps them onto the set through a lookup table;
//! anything it does not recognise renders as the Birthday template.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::types::Occasion;

// =============================================================================
// Wish Template
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum WishTemplate {
    #[default]
    Birthday,
    Anniversary,
    NewBaby,
}

/// Normalized name → template. Keys are lowercase ASCII alphanumerics.
const TEMPLATE_TABLE: &[(&str, WishTemplate)] = &[
    ("birthday", WishTemplate::Birthday),
    ("anniversary", WishTemplate::Anniversary),
    ("newbaby", WishTemplate::NewBaby),
];

impl WishTemplate {
    pub const ALL: [WishTemplate; 3] = [
        WishTemplate::Birthday,
        WishTemplate::Anniversary,
        WishTemplate::NewBaby,
    ];

    /// Looks a template up by name, falling back to Birthday.
    ///
    /// ```rust
    /// use keytowish_core::templates::WishTemplate;
    ///
    /// assert_eq!(WishTemplate::resolve("NewBaby"), WishTemplate::NewBaby);
    /// assert_eq!(WishTemplate::resolve("Minimalist"), WishTemplate::Birthday);
    /// ```
    pub fn resolve(name: &str) -> WishTemplate {
        Self::lookup(name).unwrap_or_default()
    }

    /// Exact table lookup, without the fallback.
    pub fn lookup(name: &str) -> Option<WishTemplate> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        TEMPLATE_TABLE
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, template)| *template)
    }

    /// The template that matches an occasion, if it has a dedicated one.
    pub const fn for_occasion(occasion: Occasion) -> Option<WishTemplate> {
        match occasion {
            Occasion::Birthday => Some(WishTemplate::Birthday),
            Occasion::Anniversary => Some(WishTemplate::Anniversary),
            Occasion::NewBaby => Some(WishTemplate::NewBaby),
            _ => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            WishTemplate::Birthday => "Birthday",
            WishTemplate::Anniversary => "Anniversary",
            WishTemplate::NewBaby => "NewBaby",
        }
    }

    /// Headline of the wish page.
    pub fn heading(&self, occasion: &str, recipient: &str) -> String {
        match self {
            WishTemplate::Birthday | WishTemplate::Anniversary => {
                format!("Happy {}, {}!", occasion, recipient)
            }
            WishTemplate::NewBaby => {
                format!("Congratulations on your {}, {}!", occasion, recipient)
            }
        }
    }

    /// Fixed body text below the photo.
    pub const fn message(&self) -> &'static str {
        match self {
            WishTemplate::Birthday => {
                "Wishing you a day filled with happiness and a year filled with joy!"
            }
            WishTemplate::Anniversary => {
                "Celebrating another wonderful year of love and happiness together!"
            }
            WishTemplate::NewBaby => "Welcoming this precious new life with joy and best wishes!",
        }
    }

    /// Fills the template for one recipient.
    pub fn render(&self, occasion: &str, recipient: &str) -> RenderedWish {
        let occasion = occasion.trim();
        let recipient = recipient.trim();
        RenderedWish {
            template: *self,
            heading: self.heading(occasion, recipient),
            message: self.message().to_string(),
            recipient: recipient.to_string(),
            occasion: occasion.to_string(),
        }
    }
}

impl fmt::Display for WishTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Rendered Wish
// =============================================================================

/// Text content of a wish page, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RenderedWish {
    pub template: WishTemplate,
    pub heading: String,
    pub message: String,
    pub recipient: String,
    pub occasion: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_names() {
        assert_eq!(WishTemplate::resolve("Birthday"), WishTemplate::Birthday);
        assert_eq!(WishTemplate::resolve("anniversary"), WishTemplate::Anniversary);
        assert_eq!(WishTemplate::resolve("New Baby"), WishTemplate::NewBaby);
        assert_eq!(WishTemplate::resolve("new-baby"), WishTemplate::NewBaby);
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_birthday() {
        assert_eq!(WishTemplate::resolve("Classic"), WishTemplate::Birthday);
        assert_eq!(WishTemplate::resolve(""), WishTemplate::Birthday);
        assert_eq!(WishTemplate::lookup("Elegant"), None);
    }

    #[test]
    fn test_for_occasion() {
        assert_eq!(
            WishTemplate::for_occasion(Occasion::NewBaby),
            Some(WishTemplate::NewBaby)
        );
        assert_eq!(WishTemplate::for_occasion(Occasion::Graduation), None);
    }

    #[test]
    fn test_headings() {
        assert_eq!(
            WishTemplate::Birthday.heading("Birthday", "Maya"),
            "Happy Birthday, Maya!"
        );
        assert_eq!(
            WishTemplate::NewBaby.heading("New Baby", "Sam"),
            "Congratulations on your New Baby, Sam!"
        );
    }

    #[test]
    fn test_render_trims_input() {
        let wish = WishTemplate::Anniversary.render(" Anniversary ", "  Jo & Lee ");
        assert_eq!(wish.heading, "Happy Anniversary, Jo & Lee!");
        assert_eq!(wish.recipient, "Jo & Lee");
        assert!(wish.message.starts_with("Celebrating another wonderful year"));
    }

    #[test]
    fn test_table_covers_every_template() {
        for template in WishTemplate::ALL {
            assert_eq!(WishTemplate::lookup(template.name()), Some(template));
        }
    }
}
