//! # Session Cart Runtime
//!
//! Runtime implementation for the session cart architecture.
//!
//! This crate provides the Store that runs a reducer against shared state
//! and publishes every new state, plus the session storage backends.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state and serializes reducer runs
//! - **State Watch**: Publishes every new state to subscribers
//! - **Storage**: In-memory and file-backed [`SessionStorage`](session_cart_core::environment::SessionStorage)
//!
//! ## Example
//!
//! ```ignore
//! use session_cart_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Observe state changes
//! let mut updates = store.subscribe_state();
//!
//! // Send an action
//! store.send(Action::DoSomething).await;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

/// Session storage backends
pub mod storage;

pub use storage::{FileSessionStorage, MemorySessionStorage};

/// Store module - The runtime for reducers
pub mod store {
    use session_cart_core::reducer::Reducer;
    use tokio::sync::{watch, RwLock};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. State publication to subscribers
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: RwLock<S>,
        reducer: R,
        environment: E,
        /// Latest state, replaced after every reducer run.
        state_watch: watch::Sender<S>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: Clone,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (state_watch, _) = watch::channel(initial_state.clone());

            Self {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                state_watch,
            }
        }

        /// Send an action to the store
        ///
        /// Runs the reducer under the state write lock and publishes the new
        /// state to subscribers before releasing it, so subscribers observe
        /// states in the order actions were applied.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) {
            tracing::debug!("Processing action");
            metrics::counter!("store.commands.total").increment(1);

            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let start = std::time::Instant::now();
            self.reducer.reduce(&mut state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            self.state_watch.send_replace((*state).clone());
            tracing::trace!(subscribers = self.state_watch.receiver_count(), "Published state");
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let line_count = store.state(|s| s.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Subscribe to state changes
        ///
        /// The receiver always holds the latest state; intermediate states may
        /// be skipped by a slow subscriber.
        #[must_use]
        pub fn subscribe_state(&self) -> watch::Receiver<S> {
            self.state_watch.subscribe()
        }
    }
}

// Re-export for convenience
pub use store::Store;
