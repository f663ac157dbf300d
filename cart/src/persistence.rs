//! Persisted snapshot of the cart.
//!
//! The whole [`CartState`] is stored as one JSON array under a single key of
//! a [`SessionStorage`]. Every save overwrites the previous snapshot.

use crate::types::CartState;
use session_cart_core::environment::{SessionStorage, StorageError};
use thiserror::Error;

/// Key the cart snapshot is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "cart";

/// Errors reading or writing the cart snapshot
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The storage backend failed
    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),

    /// The stored value is not a valid cart
    #[error("Stored cart under key {key:?} is malformed: {source}")]
    Decode {
        /// Storage key that was read
        key: String,
        /// Parse or invariant error
        source: serde_json::Error,
    },

    /// The cart could not be serialized
    #[error("Failed to encode cart: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Reads and writes the cart snapshot through a [`SessionStorage`]
///
/// # Example
///
/// ```
/// use session_cart::{CartPersistence, CartState};
/// use session_cart_runtime::MemorySessionStorage;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let persistence = CartPersistence::new(MemorySessionStorage::new());
/// assert!(persistence.load()?.is_empty());
///
/// persistence.save(&CartState::new())?;
/// assert_eq!(persistence.load()?, CartState::new());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CartPersistence<St> {
    storage: St,
    key: String,
}

impl<St: SessionStorage> CartPersistence<St> {
    /// Uses [`DEFAULT_STORAGE_KEY`]
    pub fn new(storage: St) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Uses a custom storage key
    pub fn with_key(storage: St, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The storage key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying storage
    pub const fn storage(&self) -> &St {
        &self.storage
    }

    /// Loads the stored cart; a missing key or a stored `null` is an empty cart
    ///
    /// # Errors
    ///
    /// - [`PersistenceError::Storage`] if the backend cannot be read
    /// - [`PersistenceError::Decode`] if the stored value is not a valid cart
    pub fn load(&self) -> Result<CartState, PersistenceError> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            tracing::debug!(key = %self.key, "No stored cart");
            return Ok(CartState::new());
        };

        let state = serde_json::from_str::<Option<CartState>>(&raw)
            .map_err(|source| PersistenceError::Decode {
                key: self.key.clone(),
                source,
            })?
            .unwrap_or_default();
        tracing::debug!(key = %self.key, lines = state.len(), "Loaded stored cart");
        Ok(state)
    }

    /// Writes the cart, replacing any previous snapshot
    ///
    /// # Errors
    ///
    /// - [`PersistenceError::Encode`] if serialization fails
    /// - [`PersistenceError::Storage`] if the backend cannot be written
    pub fn save(&self, state: &CartState) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(state).map_err(PersistenceError::Encode)?;
        self.storage.set_item(&self.key, &raw)?;
        tracing::trace!(key = %self.key, lines = state.len(), "Saved cart");
        Ok(())
    }

    /// Removes the stored cart
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Storage`] if the backend cannot be written.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        self.storage.remove_item(&self.key)?;
        tracing::info!(key = %self.key, "Cleared stored cart");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, ProductId};
    use session_cart_runtime::MemorySessionStorage;
    use session_cart_testing::FailingSessionStorage;

    fn two_line_cart() -> CartState {
        let mut state = CartState::new();
        state.append(Product::new(ProductId::new(1), "Keyboard", "Mechanical", 50));
        state.increment(ProductId::new(1));
        state.append(Product::new(ProductId::new(2), "Mouse", "Wireless", 20));
        state
    }

    #[test]
    fn missing_key_loads_empty_cart() {
        let persistence = CartPersistence::new(MemorySessionStorage::new());
        assert!(persistence.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let persistence = CartPersistence::new(MemorySessionStorage::new());
        let state = two_line_cart();

        persistence.save(&state).unwrap();

        assert_eq!(persistence.load().unwrap(), state);
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let storage = MemorySessionStorage::new();
        let persistence = CartPersistence::new(storage.clone());

        persistence.save(&two_line_cart()).unwrap();
        persistence.save(&CartState::new()).unwrap();

        assert_eq!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn custom_key_is_used() {
        let storage = MemorySessionStorage::new();
        let persistence = CartPersistence::with_key(storage.clone(), "cart-tab-2");

        persistence.save(&two_line_cart()).unwrap();

        assert_eq!(persistence.key(), "cart-tab-2");
        assert!(storage.get_item("cart-tab-2").unwrap().is_some());
        assert!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn stored_null_loads_empty_cart() {
        let storage = MemorySessionStorage::new();
        storage.set_item(DEFAULT_STORAGE_KEY, "null").unwrap();
        let persistence = CartPersistence::new(storage);

        assert!(persistence.load().unwrap().is_empty());
    }

    #[test]
    fn malformed_snapshot_is_a_decode_error() {
        let storage = MemorySessionStorage::new();
        storage.set_item(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        let persistence = CartPersistence::new(storage);

        assert!(matches!(
            persistence.load(),
            Err(PersistenceError::Decode { ref key, .. }) if key == DEFAULT_STORAGE_KEY
        ));
    }

    #[test]
    fn snapshot_breaking_invariants_is_a_decode_error() {
        let storage = MemorySessionStorage::new();
        storage
            .set_item(
                DEFAULT_STORAGE_KEY,
                r#"[{"product":{"id":1,"name":"Keyboard","price":50},"quantity":0}]"#,
            )
            .unwrap();
        let persistence = CartPersistence::new(storage);

        assert!(matches!(persistence.load(), Err(PersistenceError::Decode { .. })));
    }

    #[test]
    fn clear_removes_snapshot() {
        let persistence = CartPersistence::new(MemorySessionStorage::new());
        persistence.save(&two_line_cart()).unwrap();

        persistence.clear().unwrap();

        assert!(persistence.load().unwrap().is_empty());
    }

    #[test]
    fn storage_failure_surfaces_on_save() {
        let persistence = CartPersistence::new(FailingSessionStorage::new());
        assert!(matches!(
            persistence.save(&two_line_cart()),
            Err(PersistenceError::Storage(_))
        ));
    }
}
