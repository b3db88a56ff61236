//! Error types for Nostr operations.

use thiserror::Error;

use crate::config::SignInMode;

/// Errors that can occur during key handling, event construction and signing.
#[derive(Error, Debug)]
pub enum NostrError {
    /// Decryption of the stored key produced no usable private key.
    #[error("Invalid passphrase")]
    InvalidPassphrase,

    /// The local-key path was invoked without a passphrase.
    #[error("Passphrase is required")]
    MissingPassphrase,

    /// An encoded key (npub/nsec) is malformed or has the wrong prefix.
    #[error("Invalid key encoding: {0}")]
    InvalidEncoding(String),

    /// Delegated signing requested but no external capability is present.
    #[error("External signing capability unavailable")]
    ExternalCapabilityUnavailable,

    /// The signer does not match the configured sign-in mode.
    #[error("Signer mismatch: signed in with {expected}, got a {actual} signer")]
    SignerMismatch {
        /// The configured sign-in mode.
        expected: SignInMode,
        /// The mode of the signer that was supplied.
        actual: SignInMode,
    },

    /// Encryption operation failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption operation failed.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Key derivation failed.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Event signing failed.
    #[error("Event signing failed: {0}")]
    Signing(String),

    /// Serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid event structure or content.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Event signature verification failed.
    #[error("Invalid event signature")]
    InvalidSignature,

    /// Hex encoding/decoding error.
    #[error("Hex encoding error: {0}")]
    HexError(String),
}

/// Result type for Nostr operations.
pub type Result<T> = std::result::Result<T, NostrError>;

impl From<hex::FromHexError> for NostrError {
    fn from(e: hex::FromHexError) -> Self {
        Self::HexError(e.to_string())
    }
}
