//! Configuration for the cart CLI.
//!
//! Loads configuration from environment variables with defaults:
//!
//! | variable | default |
//! |---|---|
//! | `CART_STORAGE_KEY` | `cart` |
//! | `CART_SESSION_DIR` | `.cart-session` |
//! | `CART_CATALOG_URL` | `http://localhost:8080/products` |
//! | `CART_CATALOG_FILE` | unset (use the URL) |
//! | `CART_RESTORE_POLICY` | `lenient` |

use crate::catalog::{
    CatalogError, ConfiguredCatalog, HttpCatalog, StaticCatalog, DEFAULT_CATALOG_URL,
};
use crate::controller::RestorePolicy;
use crate::persistence::DEFAULT_STORAGE_KEY;
use std::path::PathBuf;
use thiserror::Error;

/// Default session directory for file-backed storage
pub const DEFAULT_SESSION_DIR: &str = ".cart-session";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A variable is set to a value that cannot be used
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Session storage key of the cart snapshot
    pub storage_key: String,
    /// Directory holding the session storage files
    pub session_dir: PathBuf,
    /// Products endpoint
    pub catalog_url: String,
    /// Local JSON product list used instead of the endpoint
    pub catalog_file: Option<PathBuf>,
    /// Handling of an undecodable stored cart
    pub restore_policy: RestorePolicy,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            catalog_file: None,
            restore_policy: RestorePolicy::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let storage_key = get("CART_STORAGE_KEY").unwrap_or(defaults.storage_key);
        if storage_key.contains(['/', '\\']) {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                format!("'{storage_key}' must not contain path separators"),
            ));
        }

        let catalog_url = get("CART_CATALOG_URL").unwrap_or(defaults.catalog_url);
        if !(catalog_url.starts_with("http://") || catalog_url.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar(
                "CART_CATALOG_URL".to_string(),
                format!("'{catalog_url}' is not an http(s) URL"),
            ));
        }

        let restore_policy = match get("CART_RESTORE_POLICY") {
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::InvalidEnvVar("CART_RESTORE_POLICY".to_string(), e))?,
            None => defaults.restore_policy,
        };

        Ok(Self {
            storage_key,
            session_dir: get("CART_SESSION_DIR").map_or(defaults.session_dir, PathBuf::from),
            catalog_url,
            catalog_file: get("CART_CATALOG_FILE").map(PathBuf::from),
            restore_policy,
        })
    }

    /// Builds the catalog this configuration selects
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the configured catalog file cannot be read.
    pub fn catalog(&self) -> Result<ConfiguredCatalog, CatalogError> {
        match &self.catalog_file {
            Some(path) => Ok(ConfiguredCatalog::Static(StaticCatalog::from_file(path)?)),
            None => Ok(ConfiguredCatalog::Http(HttpCatalog::new(self.catalog_url.clone()))),
        }
    }
}
