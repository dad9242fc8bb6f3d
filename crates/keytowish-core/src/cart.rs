//! # Cart
//!
//! The cart aggregation engine: a unique-by-id list of line items whose
//! subtotal and item count are always consistent with the items.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Customer Action          Operation              Items                  │
//! │  ───────────────          ─────────              ─────                  │
//! │  "Add to cart"  ────────► add_item(candidate) ─► qty + 1 or push        │
//! │  Quantity box / ± ──────► set_quantity(id, n) ─► qty = n (n ≤ 0 removes)│
//! │  Trash icon ────────────► remove_item(id) ─────► retain(id != ..)       │
//! │  Order placed ──────────► clear() ─────────────► []                     │
//! │                                                                         │
//! │  After EVERY mutation: recompute() rebuilds subtotal and item_count     │
//! │  from scratch, inside the same &mut borrow.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are recomputed in full (O(n)) rather than patched, so they can
//! never drift from the items. Carts are human-sized.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{LineItem, TemplateCandidate};

// =============================================================================
// Cart Snapshot
// =============================================================================

/// Read-only view of the cart contents and totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Insertion order, unique by id.
    pub items: Vec<LineItem>,
    /// Σ(unit_price × quantity).
    pub subtotal: Money,
    /// Σ(quantity).
    pub item_count: i64,
}

impl CartSnapshot {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a line by template id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

// =============================================================================
// Cart Action
// =============================================================================

/// A cart mutation as a value, for the pure [`CartStore::apply`] form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CartAction {
    AddItem { candidate: TemplateCandidate },
    RemoveItem { id: String },
    SetQuantity { id: String, quantity: i64 },
    Clear,
}

// =============================================================================
// Cart Store
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same template bumps its quantity)
/// - Every stored quantity is ≥ 1
/// - `subtotal` and `item_count` always match `items`; the fields are
///   private and only `recompute()` writes them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    items: Vec<LineItem>,
    subtotal: Money,
    item_count: i64,
}

impl CartStore {
    /// Creates an empty cart.
    pub fn new() -> Self {
        CartStore::default()
    }

    /// Adds one unit of `candidate`.
    ///
    /// ## Behavior
    /// - Same id already in cart: quantity + 1 (name/price of the existing
    ///   line are kept)
    /// - Otherwise: appended with quantity 1
    ///
    /// Never fails.
    pub fn add_item(&mut self, candidate: TemplateCandidate) {
        match self.items.iter_mut().find(|i| i.id == candidate.id) {
            Some(existing) => existing.quantity += 1,
            None => self.items.push(LineItem::from_candidate(candidate)),
        }
        self.recompute();
    }

    /// Removes the line with `id`. Absent ids are a no-op.
    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|i| i.id != id);
        self.recompute();
    }

    /// Replaces (does not increment) the quantity of line `id`.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: same as [`remove_item`](Self::remove_item)
    /// - id not in cart: no-op
    pub fn set_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.quantity = quantity;
        }
        self.recompute();
    }

    /// Empties the cart unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute();
    }

    /// Current contents and totals.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            subtotal: self.subtotal,
            item_count: self.item_count,
        }
    }

    /// Applies `action` to a copy of this cart and returns the new cart.
    ///
    /// ```rust
    /// use keytowish_core::cart::{CartAction, CartStore};
    ///
    /// let empty = CartStore::new();
    /// let cleared = empty.apply(CartAction::Clear);
    /// assert_eq!(cleared.subtotal().cents(), 0);
    /// ```
    pub fn apply(&self, action: CartAction) -> CartStore {
        let mut next = self.clone();
        match action {
            CartAction::AddItem { candidate } => next.add_item(candidate),
            CartAction::RemoveItem { id } => next.remove_item(&id),
            CartAction::SetQuantity { id, quantity } => next.set_quantity(&id, quantity),
            CartAction::Clear => next.clear(),
        }
        next
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    #[inline]
    pub fn item_count(&self) -> i64 {
        self.item_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct templates in the cart.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    fn recompute(&mut self) {
        self.subtotal = self.items.iter().map(LineItem::line_total).sum();
        self.item_count = self.items.iter().map(|i| i.quantity).sum();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, cents: i64) -> TemplateCandidate {
        TemplateCandidate {
            id: id.to_string(),
            name: format!("Card {}", id),
            unit_price: Money::from_cents(cents),
            image_ref: format!("{}.jpg", id),
            category: Some("Birthday".to_string()),
        }
    }

    fn assert_consistent(cart: &CartStore) {
        let snap = cart.snapshot();
        let subtotal: i64 = snap
            .items
            .iter()
            .map(|i| i.unit_price.cents() * i.quantity)
            .sum();
        let count: i64 = snap.items.iter().map(|i| i.quantity).sum();
        assert_eq!(snap.subtotal.cents(), subtotal);
        assert_eq!(snap.item_count, count);
        assert!(snap.items.iter().all(|i| i.quantity >= 1));
    }

    #[test]
    fn test_add_same_id_twice_increments() {
        let mut cart = CartStore::new();
        cart.add_item(card("b1", 499));
        cart.add_item(card("b1", 499));

        let snap = cart.snapshot();
        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.items[0].quantity, 2);
        assert_eq!(snap.subtotal.cents(), 998);
        assert_eq!(snap.item_count, 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = CartStore::new();
        cart.add_item(card("b2", 499));
        cart.add_item(card("a1", 499));
        cart.add_item(card("b2", 499));

        let snap = cart.snapshot();
        let ids: Vec<&str> = snap.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "a1"]);
    }

    #[test]
    fn test_set_quantity_replaces() {
        let mut cart = CartStore::new();
        cart.add_item(card("b1", 499));
        cart.set_quantity("b1", 5);

        assert_eq!(cart.snapshot().get("b1").map(|i| i.quantity), Some(5));
        assert_eq!(cart.subtotal().cents(), 2495);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let mut cart = CartStore::new();
        cart.add_item(card("b1", 499));
        cart.add_item(card("a1", 299));

        cart.set_quantity("b1", 0);
        assert!(cart.snapshot().get("b1").is_none());

        cart.set_quantity("a1", -3);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(card("b1", 499));
        let before = cart.snapshot();

        cart.set_quantity("zz", 4);
        assert_eq!(cart.snapshot(), before);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(card("b1", 499));
        let before = cart.snapshot();

        cart.remove_item("nope");
        assert_eq!(cart.snapshot(), before);
    }

    #[test]
    fn test_clear() {
        let mut cart = CartStore::new();
        cart.add_item(card("b1", 499));
        cart.add_item(card("a2", 799));
        cart.clear();

        assert!(cart.snapshot().is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.subtotal().cents(), 0);
    }

    #[test]
    fn test_totals_stay_consistent_over_mixed_sequence() {
        let mut cart = CartStore::new();
        let ops: Vec<CartAction> = vec![
            CartAction::AddItem { candidate: card("b1", 499) },
            CartAction::AddItem { candidate: card("b2", 350) },
            CartAction::AddItem { candidate: card("b1", 499) },
            CartAction::SetQuantity { id: "b2".to_string(), quantity: 7 },
            CartAction::RemoveItem { id: "missing".to_string() },
            CartAction::AddItem { candidate: card("a1", 1) },
            CartAction::SetQuantity { id: "b1".to_string(), quantity: -1 },
            CartAction::SetQuantity { id: "a1".to_string(), quantity: 12 },
            CartAction::RemoveItem { id: "b2".to_string() },
            CartAction::AddItem { candidate: card("b2", 350) },
        ];

        for op in ops {
            cart = cart.apply(op);
            assert_consistent(&cart);
        }

        assert_eq!(cart.item_count(), 13);
        assert_eq!(cart.subtotal().cents(), 12 + 350);
    }

    #[test]
    fn test_apply_leaves_original_untouched() {
        let original = CartStore::new().apply(CartAction::AddItem { candidate: card("b1", 499) });
        let next = original.apply(CartAction::AddItem { candidate: card("b1", 499) });

        assert_eq!(original.item_count(), 1);
        assert_eq!(next.item_count(), 2);
    }

    #[test]
    fn test_category_carried_through() {
        let mut cart = CartStore::new();
        let mut candidate = card("x", 100);
        candidate.category = None;
        cart.add_item(candidate);
        cart.add_item(card("y", 100));

        let snap = cart.snapshot();
        assert_eq!(snap.items[0].category, None);
        assert_eq!(snap.items[1].category.as_deref(), Some("Birthday"));
    }
}
