//! Key-value store abstraction for persisted client settings.
//!
//! The application owns persistence (browser local storage, a settings file,
//! a platform keychain); this crate only reads and writes string values
//! through [`KeyValueStore`].

use std::collections::HashMap;
use std::sync::RwLock;

use super::error::{ConfigError, ConfigResult};

/// Storage key for the sign-in mode (`"extension"` or `"nsec"`).
pub const SIGN_IN_KEY: &str = "signIn";

/// Storage key for the passphrase-encrypted private key blob.
pub const ENCRYPTED_PRIVATE_KEY_KEY: &str = "encryptedPrivateKey";

/// Storage key for the user's npub.
pub const NPUB_KEY: &str = "npub";

/// Storage key for the JSON array of relay URLs.
pub const RELAYS_KEY: &str = "relays";

/// Storage key for the JSON array of mint URLs.
pub const MINTS_KEY: &str = "mints";

/// String key-value storage for client settings.
///
/// Implementations must be `Send + Sync` to allow use across tasks.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    fn get(&self, key: &str) -> ConfigResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    fn set(&self, key: &str, value: &str) -> ConfigResult<()>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    fn remove(&self, key: &str) -> ConfigResult<()>;
}

/// In-memory [`KeyValueStore`], for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let data = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            data: RwLock::new(data),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| ConfigError::Storage(e.to_string()))?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ConfigResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ConfigError::Storage(e.to_string()))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ConfigResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| ConfigError::Storage(e.to_string()))?;
        data.remove(key);
        Ok(())
    }
}
