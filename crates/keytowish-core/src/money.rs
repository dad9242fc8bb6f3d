//! # Money Module
//!
//! Card prices, cart subtotals and order totals all flow through [`Money`],
//! an integer count of cents.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog price "$4.99" ──► Money(499)                                   │
//! │                                                                         │
//! │  Float math:   4.99 * 2 * 0.1 = 0.9980000000000001                      │
//! │  Cent math:    499 * 2 = 998,  998 * 1000 bps = 99.8 → 100 cents        │
//! │                                                                         │
//! │  The only rounding in the whole order happens once, in calculate_tax.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use keytowish_core::money::Money;
//!
//! let price: Money = "$4.99".parse().unwrap();
//! assert_eq!(price.cents(), 499);
//! assert_eq!((price * 2).to_string(), "$9.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Template price ──► LineItem.unit_price ──► line total (× quantity)     │
/// │                                                  │                      │
/// │                                                  ▼                      │
/// │  CartSnapshot.subtotal ──► OrderTotals.tax ──► OrderTotals.grand_total  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use keytowish_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(499).cents(), 499);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole currency units (dollars).
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// The cents portion, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, rounding half up to the cent.
    ///
    /// Integer formula: `(cents * bps + 5000) / 10000`.
    ///
    /// ```rust
    /// use keytowish_core::money::Money;
    /// use keytowish_core::types::TaxRate;
    ///
    /// // $9.98 at 10% = $0.998 → $1.00
    /// let tax = Money::from_cents(998).calculate_tax(TaxRate::from_bps(1000));
    /// assert_eq!(tax.cents(), 100);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large carts from overflowing the intermediate product
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Line total for `qty` units at this unit price.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses catalog display prices such as `"$4.99"`, `"4.99"`, `"5"` or `"$0.5"`.
///
/// At most two fractional digits are accepted; negative prices are rejected
/// because a template can never cost less than nothing.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: reason.to_string(),
        };

        let raw = s.trim();
        let raw = raw.strip_prefix('$').unwrap_or(raw).trim();
        if raw.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let (whole, frac) = match raw.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (raw, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must be a non-negative decimal amount"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let dollars: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("bad cents"))? * 10,
            _ => frac.parse().map_err(|_| invalid("bad cents"))?,
        };

        dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .map(Money)
            .ok_or_else(|| invalid("amount too large"))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$10.98`. The storefront formats with its configured
/// currency symbol instead; this is for logs and tests.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
