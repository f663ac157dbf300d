//! Error type for cart operations.

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::persistence::PersistenceError;
use crate::types::ProductId;
use thiserror::Error;

/// Errors surfaced by the cart controller and its collaborators
#[derive(Error, Debug)]
pub enum CartError {
    /// Reading or writing the persisted cart failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Fetching the catalog failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// An encoded action could not be decoded
    #[error("Malformed action: {0}")]
    InvalidAction(#[source] serde_json::Error),

    /// The catalog has no product with this id
    #[error("Product {0} not found in catalog")]
    ProductNotFound(ProductId),

    /// Configuration is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
