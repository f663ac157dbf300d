//! Session storage backends.
//!
//! - [`MemorySessionStorage`]: values live as long as the process does
//! - [`FileSessionStorage`]: one file per key under a session directory, so a
//!   session can span several invocations of a command-line tool

use session_cart_core::environment::{SessionStorage, StorageError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory session storage
///
/// Cloning shares the underlying map, the way every component of one browser
/// tab sees the same `sessionStorage`.
///
/// # Example
///
/// ```
/// use session_cart_runtime::MemorySessionStorage;
/// use session_cart_core::environment::SessionStorage;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let storage = MemorySessionStorage::new();
/// storage.set_item("cart", "[]")?;
/// assert_eq!(storage.get_item("cart")?, Some("[]".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStorage {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySessionStorage {
    /// Create a new empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.data.read().map_err(poisoned)?.len())
    }

    /// Whether no key is stored
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StorageError {
    StorageError::Backend("session storage lock poisoned".to_string())
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.data
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.data.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

/// Directory-backed session storage
///
/// Each key is stored in `<dir>/<key>.json`. Keys are restricted to ASCII
/// alphanumerics, `-`, `_` and `.` (not leading) so they map onto file names
/// without escaping.
#[derive(Clone, Debug)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    /// Open (and create if needed) a session directory
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "Opened session storage");
        Ok(Self { dir })
    }

    /// The session directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SessionStorage for FileSessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::write(self.path_for(key)?, value)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)?) {
            Err(error) if error.kind() != std::io::ErrorKind::NotFound => Err(error.into()),
            _ => Ok(()),
        }
    }
}
