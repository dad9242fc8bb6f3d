//! # Checkout State
//!
//! Holds the one checkout session in progress, if any.
//!
//! ```text
//! None ── begin_checkout ──► Some(session @ Shipping)
//!                                  │
//!              advance / back / update_* mutate in place
//!                                  │
//!          place_order ──► submitting (session frozen while the gateway
//!                                  │     call is in flight)
//!                                  ▼
//!                          Some(session @ Complete)   (kept for the
//!                                  │                    confirmation page)
//!   cancel_checkout / next begin ──┘──► None / fresh session
//! ```
//!
//! ## Order Submission
//! The gateway call is awaited without holding the lock. A [`Submission`]
//! marks the session as submitting for that time: starting, cancelling or
//! editing checkout is refused with `ORDER_IN_PROGRESS` until the submission
//! finishes or is dropped, so an order the gateway accepted is always
//! recorded on the session it was built from.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use keytowish_core::CheckoutSession;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Default)]
struct CheckoutSlot {
    session: Option<CheckoutSession>,
    submitting: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CheckoutState {
    slot: Arc<Mutex<CheckoutSlot>>,
}

impl CheckoutState {
    pub fn new() -> Self {
        CheckoutState::default()
    }

    /// Replaces whatever session was open.
    ///
    /// ## Errors
    /// `ORDER_IN_PROGRESS` while the open session is being submitted.
    pub fn start(&self, session: CheckoutSession) -> ApiResult<()> {
        let mut slot = self.unlocked_slot()?;
        slot.session = Some(session);
        Ok(())
    }

    /// Drops the open session. Returns whether there was one.
    ///
    /// ## Errors
    /// `ORDER_IN_PROGRESS` while the open session is being submitted.
    pub fn cancel(&self) -> ApiResult<bool> {
        let mut slot = self.unlocked_slot()?;
        Ok(slot.session.take().is_some())
    }

    /// A copy of the open session.
    pub fn current(&self) -> Option<CheckoutSession> {
        self.lock().session.clone()
    }

    /// Whether an order for the open session is in flight.
    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    /// Runs `f` against the open session.
    ///
    /// ## Errors
    /// `NO_CHECKOUT` when no session is open, `ORDER_IN_PROGRESS` while it is
    /// being submitted, otherwise whatever `f` returns.
    pub fn with_session_mut<F, R>(&self, f: F) -> ApiResult<R>
    where
        F: FnOnce(&mut CheckoutSession) -> ApiResult<R>,
    {
        let mut slot = self.unlocked_slot()?;
        let session = slot.session.as_mut().ok_or_else(ApiError::no_checkout)?;
        f(session)
    }

    /// Freezes the open session for an order submission.
    ///
    /// ## Errors
    /// `NO_CHECKOUT` when no session is open, `ORDER_IN_PROGRESS` when another
    /// submission already holds it.
    pub fn begin_submission(&self) -> ApiResult<Submission<'_>> {
        let mut slot = self.unlocked_slot()?;
        let session = slot.session.clone().ok_or_else(ApiError::no_checkout)?;
        slot.submitting = true;

        Ok(Submission {
            state: self,
            session,
        })
    }

    fn unlocked_slot(&self) -> ApiResult<MutexGuard<'_, CheckoutSlot>> {
        let slot = self.lock();
        if slot.submitting {
            return Err(ApiError::order_in_progress());
        }
        Ok(slot)
    }

    fn lock(&self) -> MutexGuard<'_, CheckoutSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Submission
// =============================================================================

/// An order submission in flight. Dropping it unfreezes the session
/// unchanged.
#[derive(Debug)]
pub struct Submission<'a> {
    state: &'a CheckoutState,
    session: CheckoutSession,
}

impl Submission<'_> {
    /// The session as it was frozen.
    pub fn session(&self) -> &CheckoutSession {
        &self.session
    }

    /// Unfreezes the session and applies `f` to it.
    pub fn finish<F, R>(self, f: F) -> ApiResult<R>
    where
        F: FnOnce(&mut CheckoutSession) -> ApiResult<R>,
    {
        let mut slot = self.state.lock();
        slot.submitting = false;
        let session = slot.session.as_mut().ok_or_else(ApiError::no_checkout)?;
        f(session)
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        self.state.lock().submitting = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use keytowish_core::{CartStore, CheckoutStep, Money, TemplateCandidate};

    fn session() -> CheckoutSession {
        let mut cart = CartStore::new();
        cart.add_item(TemplateCandidate {
            id: "b1".to_string(),
            name: "Balloons".to_string(),
            unit_price: Money::from_cents(499),
            image_ref: String::new(),
            category: None,
        });
        CheckoutSession::begin(cart.snapshot()).unwrap()
    }

    #[test]
    fn test_no_session_until_started() {
        let state = CheckoutState::new();
        assert!(state.current().is_none());
        assert!(!state.cancel().unwrap());

        let err = state.with_session_mut(|s| Ok(s.step())).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoCheckout);
        assert_eq!(state.begin_submission().unwrap_err().code, ErrorCode::NoCheckout);
    }

    #[test]
    fn test_start_mutate_cancel() {
        let state = CheckoutState::new();
        state.start(session()).unwrap();

        let step = state.with_session_mut(|s| Ok(s.back())).unwrap();
        assert_eq!(step, CheckoutStep::Shipping);
        assert_eq!(state.current().map(|s| s.step()), Some(CheckoutStep::Shipping));

        assert!(state.cancel().unwrap());
        assert!(state.current().is_none());
    }

    #[test]
    fn test_session_frozen_while_submitting() {
        let state = CheckoutState::new();
        state.start(session()).unwrap();

        let submission = state.begin_submission().unwrap();
        assert!(state.is_submitting());

        let in_progress = |err: ApiError| err.code == ErrorCode::OrderInProgress;
        assert!(in_progress(state.cancel().unwrap_err()));
        assert!(in_progress(state.start(session()).unwrap_err()));
        assert!(in_progress(state.with_session_mut(|s| Ok(s.back())).unwrap_err()));
        assert!(in_progress(state.begin_submission().unwrap_err()));

        // still readable
        assert_eq!(state.current().as_ref(), Some(submission.session()));

        let step = submission.finish(|s| Ok(s.step())).unwrap();
        assert_eq!(step, CheckoutStep::Shipping);
        assert!(!state.is_submitting());
        assert!(state.cancel().unwrap());
    }

    #[test]
    fn test_dropped_submission_unfreezes() {
        let state = CheckoutState::new();
        state.start(session()).unwrap();

        drop(state.begin_submission().unwrap());

        assert!(!state.is_submitting());
        assert!(state.with_session_mut(|s| Ok(s.step())).is_ok());
    }
}
