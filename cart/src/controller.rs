//! Cart controller: turns intentions into actions and persists every change.
//!
//! The controller owns a runtime [`Store`] running the [`CartReducer`] and a
//! [`CartPersistence`] adapter. Each intention:
//!
//! 1. picks the action (`Add` for a new product, `UpdateQuantity` for one
//!    already in the cart, `Delete` for removal),
//! 2. sends it through the store, which publishes the new state to
//!    subscribers,
//! 3. writes the new state to session storage before returning.

use crate::error::CartError;
use crate::persistence::{CartPersistence, PersistenceError};
use crate::reducer::{CartEnvironment, CartReducer};
use crate::types::{CartAction, CartState, Product, ProductId};
use session_cart_core::environment::SessionStorage;
use session_cart_runtime::Store;
use std::fmt;
use std::str::FromStr;
use tokio::sync::{watch, Mutex};

/// Store running the cart reducer
pub type CartStore = Store<CartState, CartAction, CartEnvironment, CartReducer>;

/// What to do when the stored cart cannot be decoded at startup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestorePolicy {
    /// Start with an empty cart and log a warning
    #[default]
    Lenient,
    /// Fail controller construction
    Strict,
}

impl fmt::Display for RestorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for RestorePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("expected 'lenient' or 'strict', got '{other}'")),
        }
    }
}

/// The cart controller
///
/// # Example
///
/// ```no_run
/// use session_cart::{CartController, CartPersistence, Product, ProductId, RestorePolicy};
/// use session_cart_runtime::MemorySessionStorage;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let persistence = CartPersistence::new(MemorySessionStorage::new());
/// let controller = CartController::new(persistence, RestorePolicy::Lenient)?;
///
/// let keyboard = Product::new(ProductId::new(1), "Keyboard", "", 50);
/// controller.add_product(keyboard.clone()).await?;
/// controller.add_product(keyboard).await?;
///
/// let cart = controller.cart_items().await;
/// assert_eq!(cart.lines()[0].quantity, 2);
/// # Ok(())
/// # }
/// ```
pub struct CartController<St> {
    store: CartStore,
    persistence: CartPersistence<St>,
    /// Keeps the check-dispatch-save sequence of one intention from
    /// interleaving with another's.
    dispatch_lock: Mutex<()>,
}

impl<St: SessionStorage> CartController<St> {
    /// Creates a controller, hydrating the cart from storage
    ///
    /// A missing snapshot gives an empty cart. A snapshot that cannot be
    /// decoded gives an empty cart under [`RestorePolicy::Lenient`].
    ///
    /// # Errors
    ///
    /// - [`CartError::Persistence`] if storage cannot be read
    /// - [`CartError::Persistence`] for an undecodable snapshot under [`RestorePolicy::Strict`]
    pub fn new(persistence: CartPersistence<St>, policy: RestorePolicy) -> Result<Self, CartError> {
        let initial = match persistence.load() {
            Ok(state) => state,
            Err(PersistenceError::Decode { key, source }) if policy == RestorePolicy::Lenient => {
                tracing::warn!(%key, error = %source, "Discarding malformed stored cart");
                CartState::new()
            },
            Err(error) => return Err(error.into()),
        };

        tracing::info!(lines = initial.len(), %policy, "Cart controller ready");

        Ok(Self {
            store: Store::new(initial, CartReducer::new(), CartEnvironment::new()),
            persistence,
            dispatch_lock: Mutex::new(()),
        })
    }

    /// Adds one unit of `product`
    ///
    /// A product already in the cart gets its quantity incremented; a new
    /// one is appended as a single-unit line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persistence`] if the new state cannot be
    /// persisted. The in-memory cart keeps the change.
    pub async fn add_product(&self, product: Product) -> Result<(), CartError> {
        let _guard = self.dispatch_lock.lock().await;
        let exists = self.store.state(|state| state.contains(product.id)).await;
        let action = if exists {
            CartAction::UpdateQuantity(product)
        } else {
            CartAction::Add(product)
        };
        self.dispatch(action).await
    }

    /// Removes the line for `id`; removing a product not in the cart is a no-op
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persistence`] if the new state cannot be
    /// persisted.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), CartError> {
        let _guard = self.dispatch_lock.lock().await;
        self.dispatch(CartAction::Delete(id)).await
    }

    /// Dispatches an action in its wire form as-is, without routing
    ///
    /// Returns `false` when the action kind is not recognized; the cart is
    /// left untouched and nothing is written.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidAction`] if `raw` is not a well-formed action
    /// - [`CartError`] from dispatching, as for [`Self::add_product`]
    pub async fn dispatch_encoded(&self, raw: &str) -> Result<bool, CartError> {
        let Some(action) = CartAction::decode(raw).map_err(CartError::InvalidAction)? else {
            return Ok(false);
        };
        let _guard = self.dispatch_lock.lock().await;
        self.dispatch(action).await?;
        Ok(true)
    }

    /// Sends `action` and persists the resulting state
    #[tracing::instrument(skip(self, action), fields(kind = action.kind(), product_id = %action.product_id()))]
    async fn dispatch(&self, action: CartAction) -> Result<(), CartError> {
        self.store.send(action).await;

        let snapshot = self.store.state(Clone::clone).await;
        if let Err(error) = self.persistence.save(&snapshot) {
            tracing::error!(%error, "Failed to persist cart");
            return Err(error.into());
        }

        tracing::debug!(lines = snapshot.len(), total = snapshot.total(), "Cart updated");
        Ok(())
    }

    /// Snapshot of the current cart
    pub async fn cart_items(&self) -> CartState {
        self.store.state(Clone::clone).await
    }

    /// Sum of all line subtotals
    pub async fn total(&self) -> i64 {
        self.store.state(CartState::total).await
    }

    /// Number of lines in the cart
    pub async fn line_count(&self) -> usize {
        self.store.state(CartState::len).await
    }

    /// Subscribe to cart changes
    ///
    /// The receiver holds the latest cart and is notified after every
    /// intention.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.store.subscribe_state()
    }

    /// The persistence adapter
    pub const fn persistence(&self) -> &CartPersistence<St> {
        &self.persistence
    }
}
