//! Shopping cart with a session-persisted state.
//!
//! The cart is a small state machine built on the session-cart runtime:
//!
//! - [`CartReducer`] - pure transitions over [`CartState`] for
//!   [`CartAction::Add`], [`CartAction::UpdateQuantity`] and
//!   [`CartAction::Delete`]
//! - [`CartController`] - routes "add product" / "delete product" to the right
//!   action, persists every new state and notifies subscribers
//! - [`CartPersistence`] - reads and writes the cart snapshot under one key of
//!   a [`SessionStorage`](session_cart_core::environment::SessionStorage)
//! - [`catalog`], [`view`] - product listing and text rendering used by the CLI
//!
//! # Quick Start
//!
//! ```no_run
//! use session_cart::{CartController, CartPersistence, Product, ProductId, RestorePolicy};
//! use session_cart_runtime::MemorySessionStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = CartController::new(
//!     CartPersistence::new(MemorySessionStorage::new()),
//!     RestorePolicy::Lenient,
//! )?;
//!
//! controller
//!     .add_product(Product::new(ProductId::new(1), "Keyboard", "Mechanical", 50))
//!     .await?;
//! controller.delete_product(ProductId::new(1)).await?;
//!
//! assert!(controller.cart_items().await.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod persistence;
pub mod reducer;
pub mod types;
pub mod view;

pub use catalog::{CatalogError, ConfiguredCatalog, HttpCatalog, ProductCatalog, StaticCatalog};
pub use config::{CartConfig, ConfigError};
pub use controller::{CartController, CartStore, RestorePolicy};
pub use error::CartError;
pub use persistence::{CartPersistence, PersistenceError, DEFAULT_STORAGE_KEY};
pub use reducer::{CartEnvironment, CartReducer};
pub use types::{CartAction, CartLine, CartState, InvariantViolation, Product, ProductId};
pub use view::{render_cart, render_catalog, CartView, CatalogView, Route};
