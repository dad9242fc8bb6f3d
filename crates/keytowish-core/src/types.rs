//! # Domain Types
//!
//! Shared value types for the storefront.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌───────────────────┐   addItem   ┌───────────────────┐                │
//! │  │ TemplateCandidate │ ──────────► │     LineItem      │                │
//! │  │  id, name         │             │  id, name         │                │
//! │  │  unit_price       │             │  unit_price       │                │
//! │  │  image_ref        │             │  image_ref        │                │
//! │  │  category         │             │  category         │                │
//! │  └───────────────────┘             │  quantity ≥ 1     │                │
//! │                                    └───────────────────┘                │
//! │  ┌───────────────────┐   ┌───────────────────┐                          │
//! │  │     Occasion      │   │      TaxRate      │                          │
//! │  │  Birthday, ...    │   │  1000 bps = 10%   │                          │
//! │  └───────────────────┘   └───────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (1 bps = 0.01%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// The rate as a percentage, for display only.
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    /// The flat storefront rate.
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Occasion
// =============================================================================

/// Occasion categories customers browse by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum Occasion {
    Birthday,
    Anniversary,
    NewBaby,
    Friendship,
    Motivation,
    Graduation,
    JobSuccess,
}

impl Occasion {
    /// Every occasion, in catalog display order.
    pub const ALL: [Occasion; 7] = [
        Occasion::Birthday,
        Occasion::Anniversary,
        Occasion::NewBaby,
        Occasion::Friendship,
        Occasion::Motivation,
        Occasion::Graduation,
        Occasion::JobSuccess,
    ];

    /// Human-readable name ("New Baby"), also used as the line item category.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Occasion::Birthday => "Birthday",
            Occasion::Anniversary => "Anniversary",
            Occasion::NewBaby => "New Baby",
            Occasion::Friendship => "Friendship",
            Occasion::Motivation => "Motivation",
            Occasion::Graduation => "Graduation",
            Occasion::JobSuccess => "Job Success",
        }
    }

    /// URL slug ("new-baby").
    pub const fn slug(&self) -> &'static str {
        match self {
            Occasion::Birthday => "birthday",
            Occasion::Anniversary => "anniversary",
            Occasion::NewBaby => "new-baby",
            Occasion::Friendship => "friendship",
            Occasion::Motivation => "motivation",
            Occasion::Graduation => "graduation",
            Occasion::JobSuccess => "job-success",
        }
    }

    /// Short blurb shown on the category page.
    pub const fn description(&self) -> &'static str {
        match self {
            Occasion::Birthday => "Make someone's birthday extra special with personalized wishes.",
            Occasion::Anniversary => "Celebrate love & commitment with heartfelt anniversary messages.",
            Occasion::NewBaby => "Welcome the newest family member with joy and love.",
            Occasion::Friendship => "Show appreciation for the friends in your life.",
            Occasion::Motivation => "Encourage and inspire with positive messages.",
            Occasion::Graduation => "Celebrate academic achievements and new beginnings.",
            Occasion::JobSuccess => "Congratulate career milestones and achievements.",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Accepts display names, slugs and camelCase names, ignoring case.
impl FromStr for Occasion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if wanted.is_empty() {
            return Err(ValidationError::Required {
                field: "occasion".to_string(),
            });
        }

        Occasion::ALL
            .into_iter()
            .find(|o| {
                let name: String = o
                    .display_name()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect();
                name.eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "occasion".to_string(),
                reason: format!("unknown occasion '{}'", s.trim()),
            })
    }
}

// =============================================================================
// Template Candidate
// =============================================================================

/// A purchasable card as supplied by the template catalog.
///
/// The core trusts candidates as given: it does not check that the template
/// exists or that the price is current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCandidate {
    pub id: String,
    pub name: String,
    pub unit_price: Money,
    /// Opaque to the engine.
    pub image_ref: String,
    pub category: Option<String>,
}

// =============================================================================
// Line Item
// =============================================================================

/// One template plus its quantity in the cart.
///
/// ## Invariant
/// `quantity >= 1` while the item is in a cart. Only `cart.rs` builds or
/// changes line items, which is how the invariant is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub image_ref: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub category: Option<String>,
}

impl LineItem {
    /// A fresh line for `candidate` with quantity 1.
    pub(crate) fn from_candidate(candidate: TemplateCandidate) -> Self {
        LineItem {
            id: candidate.id,
            name: candidate.name,
            image_ref: candidate.image_ref,
            unit_price: candidate.unit_price,
            quantity: 1,
            category: candidate.category,
        }
    }

    /// unit_price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
