//! Reducer logic for the shopping cart.
//!
//! The reducer is a pure transition function: it never touches storage, and
//! every action it accepts leaves the cart with unique product lines and
//! non-zero quantities.

use crate::types::{CartAction, CartState};
use session_cart_core::reducer::Reducer;

/// Environment dependencies for the cart reducer
///
/// The cart reducer needs nothing from the outside world. Persistence is the
/// controller's concern.
#[derive(Clone, Debug, Default)]
pub struct CartEnvironment;

impl CartEnvironment {
    /// Creates a new `CartEnvironment`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Reducer for the cart
#[derive(Clone, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new `CartReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &Self::Environment) {
        match action {
            CartAction::Add(product) => {
                let id = product.id;
                if state.contains(id) {
                    // Add is routed by the caller; a misrouted one still must not duplicate the line
                    tracing::warn!(product_id = %id, "Add for a product already in the cart, incrementing");
                    state.increment(id);
                } else {
                    state.append(product);
                }
            },
            CartAction::UpdateQuantity(product) => {
                if !state.increment(product.id) {
                    tracing::debug!(product_id = %product.id, "No cart line to update");
                }
            },
            CartAction::Delete(id) => {
                if !state.remove(id) {
                    tracing::debug!(product_id = %id, "No cart line to delete");
                }
            },
        }
    }
}
