//! The user's Nostr identity keypair.
//!
//! An [`IdentityKeypair`] only ever exists for the duration of a single
//! signing or encryption operation: it is recovered from the passphrase
//! protected blob, used, and dropped.
//!
//! # Security
//!
//! - Secret bytes are automatically zeroized on drop via [`ZeroizeOnDrop`]
//! - Temporary copies are manually zeroized after use
//! - Debug output never includes secret material

use nostr::prelude::{Keys, PublicKey, ToBech32};
use nostr::secp256k1::{Keypair, Message, SecretKey as Secp256k1SecretKey};
use nostr::SecretKey as NostrSecretKey;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::nostr::error::{NostrError, Result};
use crate::nostr::keys::{decode_encoded_key, KeyRole, SECP};

/// A Nostr identity keypair (nsec/npub).
///
/// # Example
///
/// ```
/// use shopstr_core::nostr::IdentityKeypair;
///
/// let keypair = IdentityKeypair::generate();
/// let nsec = keypair.export_nsec().unwrap();
/// assert!(nsec.starts_with("nsec1"));
///
/// let restored = IdentityKeypair::from_nsec(&nsec).unwrap();
/// assert_eq!(keypair.pubkey_hex(), restored.pubkey_hex());
/// ```
#[derive(ZeroizeOnDrop)]
pub struct IdentityKeypair {
    /// The secret key bytes (zeroized on drop).
    secret_bytes: [u8; 32],

    /// Cached public key bytes (not sensitive, skip zeroization).
    #[zeroize(skip)]
    pubkey_bytes: [u8; 32],
}

impl IdentityKeypair {
    /// Generates a new random identity keypair.
    #[must_use]
    pub fn generate() -> Self {
        let keys = Keys::generate();

        Self {
            secret_bytes: keys.secret_key().secret_bytes(),
            pubkey_bytes: keys.public_key().to_bytes(),
        }
    }

    /// Creates an identity keypair from raw secret key bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes don't represent a valid secret key.
    pub fn from_secret_bytes(secret_bytes: [u8; 32]) -> Result<Self> {
        let secret_key = Secp256k1SecretKey::from_slice(&secret_bytes)
            .map_err(|e| NostrError::KeyDerivation(e.to_string()))?;

        let keypair = Keypair::from_secret_key(&SECP, &secret_key);
        let (public_key, _parity) = keypair.x_only_public_key();

        Ok(Self {
            secret_bytes,
            pubkey_bytes: public_key.serialize(),
        })
    }

    /// Imports an identity from an nsec (NIP-19 bech32-encoded secret key).
    ///
    /// # Errors
    ///
    /// Returns [`NostrError::InvalidEncoding`] if the nsec is malformed.
    pub fn from_nsec(nsec: &str) -> Result<Self> {
        let secret_bytes = decode_encoded_key(nsec, KeyRole::Private)?;
        Self::from_secret_bytes(*secret_bytes)
    }

    /// Exports the secret key as nsec.
    ///
    /// Only used to produce the plaintext of the encrypted key blob.
    ///
    /// # Errors
    ///
    /// Returns an error if bech32 encoding fails.
    pub fn export_nsec(&self) -> Result<Zeroizing<String>> {
        let mut secret_bytes_copy = self.secret_bytes;

        let result = NostrSecretKey::from_slice(&secret_bytes_copy)
            .map_err(|e| NostrError::KeyDerivation(e.to_string()))
            .and_then(|secret_key| {
                secret_key
                    .to_bech32()
                    .map(Zeroizing::new)
                    .map_err(|e| NostrError::InvalidEncoding(e.to_string()))
            });

        secret_bytes_copy.zeroize();

        result
    }

    /// Returns the public key as a 64-character hex string.
    #[must_use]
    pub fn pubkey_hex(&self) -> String {
        hex::encode(self.pubkey_bytes)
    }

    /// Returns the public key as npub.
    ///
    /// # Errors
    ///
    /// Returns an error if bech32 encoding fails.
    pub fn npub(&self) -> Result<String> {
        let pubkey = PublicKey::from_slice(&self.pubkey_bytes)
            .map_err(|e| NostrError::KeyDerivation(e.to_string()))?;

        pubkey
            .to_bech32()
            .map_err(|e| NostrError::InvalidEncoding(e.to_string()))
    }

    /// Returns the raw public key bytes.
    #[must_use]
    pub const fn pubkey_bytes(&self) -> [u8; 32] {
        self.pubkey_bytes
    }

    /// Signs a 32-byte event id using a BIP-340 Schnorr signature.
    ///
    /// Returns the 64-byte signature as a 128-character hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn sign(&self, message_hash: &[u8; 32]) -> Result<String> {
        let mut secret_bytes_copy = self.secret_bytes;

        let result = (|| {
            let secret_key = Secp256k1SecretKey::from_slice(&secret_bytes_copy)
                .map_err(|e| NostrError::Signing(e.to_string()))?;

            let keypair = Keypair::from_secret_key(&SECP, &secret_key);
            let message = Message::from_digest(*message_hash);
            let signature = SECP.sign_schnorr(&message, &keypair);

            Ok(hex::encode(signature.serialize()))
        })();

        secret_bytes_copy.zeroize();

        result
    }

    /// Returns the secret key as the `nostr` crate type, for NIP-04.
    ///
    /// The returned key is not zeroized by the `nostr` crate; callers keep it
    /// on the stack for the duration of one encryption and drop it.
    pub(crate) fn nostr_secret_key(&self) -> Result<NostrSecretKey> {
        NostrSecretKey::from_slice(&self.secret_bytes)
            .map_err(|e| NostrError::KeyDerivation(e.to_string()))
    }

    /// Returns the raw secret key bytes, wrapped in `Zeroizing`.
    #[must_use]
    pub(crate) fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret_bytes)
    }
}

impl std::fmt::Debug for IdentityKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret key
        f.debug_struct("IdentityKeypair")
            .field("pubkey", &self.pubkey_hex())
            .finish()
    }
}
