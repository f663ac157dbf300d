//! # Session Cart Testing
//!
//! Testing utilities and helpers for the session cart architecture.
//!
//! This crate provides:
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - A `then_unchanged` check for no-op actions
//! - Mock [`SessionStorage`] implementations
//!
//! ## Example
//!
//! ```ignore
//! use session_cart_testing::RecordingSessionStorage;
//!
//! #[tokio::test]
//! async fn persists_after_add() {
//!     let storage = RecordingSessionStorage::new();
//!     let controller = CartController::new(CartPersistence::new(storage.clone()), RestorePolicy::Strict)?;
//!
//!     controller.add_product(keyboard()).await?;
//!
//!     assert_eq!(storage.writes().len(), 1);
//! }
//! ```

use session_cart_core::environment::{SessionStorage, StorageError};


pub use reducer_test::ReducerTest;

/// Mock implementations of environment traits
pub mod mocks {
    use super::{SessionStorage, StorageError};
    use session_cart_runtime::MemorySessionStorage;
    use std::sync::{Arc, Mutex};

    /// Session storage that records every write
    ///
    /// Reads and writes go through a [`MemorySessionStorage`]; each
    /// `set_item` is also appended to a history, so tests can assert what was
    /// persisted and when.
    ///
    /// # Example
    ///
    /// ```
    /// use session_cart_testing::mocks::RecordingSessionStorage;
    /// use session_cart_core::environment::SessionStorage;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let storage = RecordingSessionStorage::new();
    /// storage.set_item("cart", "[]")?;
    /// assert_eq!(storage.writes(), vec![("cart".to_string(), "[]".to_string())]);
    /// # Ok(())
    /// # }
    /// ```
    #[derive(Clone, Debug, Default)]
    pub struct RecordingSessionStorage {
        inner: MemorySessionStorage,
        writes: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl RecordingSessionStorage {
        /// Create an empty recording storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a recording storage pre-seeded with `value` under `key`
        ///
        /// Seeding is not recorded as a write.
        ///
        /// # Panics
        ///
        /// Panics if the in-memory backend lock is poisoned.
        #[must_use]
        #[allow(clippy::expect_used)]
        pub fn seeded(key: &str, value: &str) -> Self {
            let storage = Self::new();
            storage
                .inner
                .set_item(key, value)
                .expect("in-memory storage accepts writes");
            storage
        }

        /// Every `(key, value)` written so far, oldest first
        ///
        /// # Panics
        ///
        /// Panics if the history lock is poisoned.
        #[must_use]
        #[allow(clippy::unwrap_used)]
        pub fn writes(&self) -> Vec<(String, String)> {
            self.writes.lock().unwrap().clone()
        }

        /// The most recent value written under `key`
        #[must_use]
        pub fn last_write(&self, key: &str) -> Option<String> {
            self.writes()
                .into_iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v)
        }
    }

    impl SessionStorage for RecordingSessionStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.set_item(key, value)?;
            self.writes
                .lock()
                .map_err(|_| StorageError::Backend("write history poisoned".to_string()))?
                .push((key.to_string(), value.to_string()));
            Ok(())
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key)
        }
    }

    /// Session storage whose reads return a fixed value and whose writes fail
    ///
    /// Simulates a full or unavailable backend.
    #[derive(Clone, Debug, Default)]
    pub struct FailingSessionStorage {
        stored: Option<String>,
    }

    impl FailingSessionStorage {
        /// Storage that reads as empty and rejects writes
        #[must_use]
        pub const fn new() -> Self {
            Self { stored: None }
        }

        /// Storage that reads `value` for every key and rejects writes
        #[must_use]
        pub fn with_value(value: impl Into<String>) -> Self {
            Self {
                stored: Some(value.into()),
            }
        }
    }

    impl SessionStorage for FailingSessionStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.stored.clone())
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("quota exceeded".to_string()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("quota exceeded".to_string()))
        }
    }
}

// Re-export commonly used items
pub use mocks::{FailingSessionStorage, RecordingSessionStorage};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_storage_tracks_writes() -> Result<(), StorageError> {
        let storage = RecordingSessionStorage::new();
        storage.set_item("cart", "[1]")?;
        storage.set_item("other", "x")?;
        storage.set_item("cart", "[2]")?;

        assert_eq!(storage.writes().len(), 3);
        assert_eq!(storage.last_write("cart"), Some("[2]".to_string()));
        assert_eq!(storage.get_item("cart")?, Some("[2]".to_string()));
        Ok(())
    }

    #[test]
    fn seeding_is_not_a_write() -> Result<(), StorageError> {
        let storage = RecordingSessionStorage::seeded("cart", "[]");
        assert!(storage.writes().is_empty());
        assert_eq!(storage.get_item("cart")?, Some("[]".to_string()));
        Ok(())
    }

    #[test]
    fn failing_storage_rejects_writes() {
        let storage = FailingSessionStorage::with_value("not json");
        assert!(storage.set_item("cart", "[]").is_err());
        assert!(matches!(storage.get_item("cart"), Ok(Some(v)) if v == "not json"));
    }
}
