//! Error types for client configuration.

use thiserror::Error;

use crate::nostr::NostrError;

/// Errors that can occur while loading or saving client configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The key-value store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The stored sign-in mode is not recognised.
    #[error("Unknown sign-in mode: {0}")]
    InvalidSignInMode(String),

    /// A stored key is malformed.
    #[error("Invalid stored key: {0}")]
    InvalidEncoding(String),

    /// An operation needs a signed-in user.
    #[error("Not signed in")]
    NotSignedIn,

    /// Local-key mode is configured but no encrypted key is stored.
    #[error("No encrypted private key stored")]
    MissingEncryptedKey,

    /// The key or passphrase given at sign-in was rejected.
    #[error(transparent)]
    Nostr(#[from] NostrError),

    /// A value could not be serialized for storage.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
