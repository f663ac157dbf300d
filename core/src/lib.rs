//! # Session Cart Core
//!
//! Core traits for the session cart architecture.
//!
//! This crate provides the abstractions the cart is built from: a pure
//! reducer and the dependency traits injected around it.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: Pure function `(State, Action, Environment) → State`
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```
//! use session_cart_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, Default)]
//! struct TallyState {
//!     total: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum TallyAction {
//!     Bump,
//! }
//!
//! struct TallyReducer;
//!
//! impl Reducer for TallyReducer {
//!     type State = TallyState;
//!     type Action = TallyAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut TallyState, action: TallyAction, _env: &()) {
//!         match action {
//!             TallyAction::Bump => state.total += 1,
//!         }
//!     }
//! }
//!
//! let mut state = TallyState::default();
//! TallyReducer.reduce(&mut state, TallyAction::Bump, &());
//! assert_eq!(state.total, 1);
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → State`.
/// All I/O happens around them, in the layer that drives the store.
pub mod reducer {
    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Apply `action` to `state` in place
        ///
        /// Must be deterministic: the same state and action always give the
        /// same next state. An action that does not apply leaves `state`
        /// untouched.
        fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment);
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// into the layer that needs them, so reducers and controllers stay testable
/// without ambient global state.
pub mod environment {
    use thiserror::Error;

    /// Errors raised by a [`SessionStorage`] backend
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// The backend could not be read or written
        #[error("Storage I/O error: {0}")]
        Io(#[from] std::io::Error),

        /// The key cannot be represented by this backend
        #[error("Invalid storage key: {0}")]
        InvalidKey(String),

        /// Backend-specific failure
        #[error("Storage error: {0}")]
        Backend(String),
    }

    /// Session-scoped key-value storage
    ///
    /// Mirrors the browser `sessionStorage` contract: string values addressed
    /// by string keys, living for as long as one session does. Each session
    /// owns its own instance; there is no cross-session synchronization.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Production - one file per key under a session directory
    /// let storage = FileSessionStorage::open(".cart-session")?;
    ///
    /// // Test - process memory
    /// let storage = MemorySessionStorage::new();
    /// storage.set_item("cart", "[]")?;
    /// assert_eq!(storage.get_item("cart")?, Some("[]".to_string()));
    /// ```
    pub trait SessionStorage: Send + Sync {
        /// Read the value stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be read.
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Store `value` under `key`, replacing any previous value
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

        /// Remove `key`; removing a missing key is not an error
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backend cannot be written.
        fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    }

    impl<T: SessionStorage + ?Sized> SessionStorage for std::sync::Arc<T> {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            (**self).get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            (**self).set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            (**self).remove_item(key)
        }
    }
}
