//! Order submission state machine.
//!
//! ```text
//! Idle --request--> PendingConfirmation --confirm--> Idle (order stored, cart cleared)
//!                          |
//!                          +--------cancel-------> Idle (nothing changed)
//! ```
//!
//! Confirmation is split in two steps so the order is only considered
//! submitted once it is durably stored: [`CheckoutState::prepare`] builds the
//! order draft without touching anything, and [`CheckoutState::complete`]
//! clears the cart after the caller persisted it.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::{CustomerProfile, OrderDraft, SubmissionId};

/// Errors from the submission workflow.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("your cart is empty")]
    EmptyCart,
    /// Confirm or cancel without a pending submission.
    #[error("no order submission is waiting for confirmation")]
    NotPending,
}

/// Where the customer is in the submission flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Idle,
    PendingConfirmation {
        submission_id: SubmissionId,
    },
}

impl CheckoutState {
    /// Ask to submit the cart.
    ///
    /// Asking again while already pending keeps the same submission id.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart is empty.
    pub fn request(&mut self, cart: &Cart) -> Result<SubmissionId, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        match *self {
            Self::PendingConfirmation { submission_id } => Ok(submission_id),
            Self::Idle => {
                let submission_id = SubmissionId::new();
                *self = Self::PendingConfirmation { submission_id };
                Ok(submission_id)
            }
        }
    }

    /// Build the order draft for a confirmation without changing any state.
    ///
    /// The empty-cart check comes first so that a repeated confirm after a
    /// successful one reports an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart is empty and
    /// [`CheckoutError::NotPending`] if no submission was requested.
    pub fn prepare(
        &self,
        cart: &Cart,
        customer: &CustomerProfile,
    ) -> Result<OrderDraft, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        match *self {
            Self::Idle => Err(CheckoutError::NotPending),
            Self::PendingConfirmation { submission_id } => Ok(OrderDraft {
                customer: customer.clone(),
                items: cart.snapshot(),
                submission_id,
            }),
        }
    }

    /// Finish a confirmation once the order is stored.
    pub fn complete(&mut self, cart: &mut Cart) {
        cart.clear();
        *self = Self::Idle;
    }

    /// Abandon a pending submission.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotPending`] if nothing was pending.
    pub fn cancel(&mut self) -> Result<(), CheckoutError> {
        match *self {
            Self::Idle => Err(CheckoutError::NotPending),
            Self::PendingConfirmation { .. } => {
                *self = Self::Idle;
                Ok(())
            }
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::PendingConfirmation { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Email, ItemCode, Product, UnitOfMeasure};

    fn ann() -> CustomerProfile {
        CustomerProfile {
            email: Email::parse("ann@acme.com").unwrap(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            company_name: "Acme".to_string(),
        }
    }

    fn cart_with_rice() -> Cart {
        let mut cart = Cart::new();
        let product = Product::new(ItemCode::parse("SKU1").unwrap(), "Rice 5kg");
        cart.add(&product, UnitOfMeasure::Case, 3).unwrap();
        cart
    }

    #[test]
    fn test_request_requires_items() {
        let mut state = CheckoutState::Idle;
        assert_eq!(state.request(&Cart::new()), Err(CheckoutError::EmptyCart));
        assert_eq!(state, CheckoutState::Idle);
    }

    #[test]
    fn test_request_is_stable_while_pending() {
        let cart = cart_with_rice();
        let mut state = CheckoutState::Idle;
        let first = state.request(&cart).unwrap();
        let second = state.request(&cart).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_confirmation() {
        let mut cart = cart_with_rice();
        let mut state = CheckoutState::Idle;
        let submission = state.request(&cart).unwrap();

        let draft = state.prepare(&cart, &ann()).unwrap();
        assert_eq!(draft.items, cart.snapshot());
        assert_eq!(draft.submission_id, submission);
        // prepare alone changes nothing
        assert!(state.is_pending());
        assert_eq!(cart.len(), 1);

        state.complete(&mut cart);
        assert!(cart.is_empty());
        assert_eq!(state, CheckoutState::Idle);

        assert_eq!(state.prepare(&cart, &ann()), Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn test_confirm_without_request() {
        let cart = cart_with_rice();
        assert_eq!(
            CheckoutState::Idle.prepare(&cart, &ann()),
            Err(CheckoutError::NotPending)
        );
    }

    #[test]
    fn test_cancel_keeps_cart() {
        let cart = cart_with_rice();
        let mut state = CheckoutState::Idle;
        state.request(&cart).unwrap();
        state.cancel().unwrap();
        assert_eq!(state, CheckoutState::Idle);
        assert_eq!(cart.len(), 1);
        assert_eq!(state.cancel(), Err(CheckoutError::NotPending));
    }
}
