//! # Cart State
//!
//! The live cart shared by all commands.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple commands may access/modify the cart
//! 2. Only one command should modify the cart at a time
//! 3. Commands may run concurrently on the async runtime
//!
//! Locks are only ever held inside the closures passed to `with_cart*`,
//! never across an `.await`.

use std::sync::{Arc, Mutex, PoisonError};

use keytowish_core::CartStore;

/// Thread-safe handle to the live cart.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<CartStore>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust
    /// use keytowish_storefront::state::CartState;
    ///
    /// let cart_state = CartState::new();
    /// let snapshot = cart_state.with_cart(|cart| cart.snapshot());
    /// assert!(snapshot.is_empty());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartStore) -> R,
    {
        // A panic mid-mutation cannot leave CartStore inconsistent (totals are
        // recomputed in the same call), so a poisoned lock is still usable.
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartStore) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }
}
