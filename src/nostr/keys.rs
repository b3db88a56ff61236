//! Encoded key handling (NIP-19) and the shared secp256k1 context.
//!
//! Keys are shared by users as bech32 strings with a role prefix: `npub` for
//! public keys and `nsec` for private keys. This module provides the cheap
//! syntactic checks used by sign-in forms and the full decode used before a
//! key is put to work.

use std::fmt;
use std::sync::LazyLock;

use nostr::nips::nip19::FromBech32;
use nostr::secp256k1::Secp256k1;
use nostr::{PublicKey, SecretKey};
use zeroize::Zeroizing;

use crate::nostr::error::{NostrError, Result};

/// Global secp256k1 context for cryptographic operations.
///
/// Creating a `Secp256k1` context is expensive as it precomputes tables
/// for signing and verification. This shared context is initialized once
/// and reused across all operations.
pub static SECP: LazyLock<Secp256k1<nostr::secp256k1::All>> = LazyLock::new(Secp256k1::new);

/// Number of characters after the four-letter role prefix of an encoded key.
pub const ENCODED_KEY_PAYLOAD_LEN: usize = 59;

/// The role an encoded key plays, which fixes its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Public key, `npub` prefix.
    Public,
    /// Private key, `nsec` prefix.
    Private,
}

impl KeyRole {
    /// The bech32 prefix for this role.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Public => "npub",
            Self::Private => "nsec",
        }
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

fn matches_encoded_pattern(candidate: &str, role: KeyRole) -> bool {
    candidate.strip_prefix(role.prefix()).is_some_and(|payload| {
        payload.len() == ENCODED_KEY_PAYLOAD_LEN
            && payload.chars().all(|c| c.is_ascii_alphanumeric())
    })
}

/// Returns true if `public_key` looks like an `npub`: the prefix followed by
/// exactly 59 ASCII alphanumeric characters.
///
/// This does not verify the bech32 checksum.
///
/// # Example
///
/// ```
/// use shopstr_core::nostr::validate_npub;
///
/// assert!(!validate_npub("npub1tooshort"));
/// ```
#[must_use]
pub fn validate_npub(public_key: &str) -> bool {
    matches_encoded_pattern(public_key, KeyRole::Public)
}

/// Returns true if `private_key` looks like an `nsec`: the prefix followed by
/// exactly 59 ASCII alphanumeric characters.
///
/// This does not verify the bech32 checksum.
#[must_use]
pub fn validate_nsec(private_key: &str) -> bool {
    matches_encoded_pattern(private_key, KeyRole::Private)
}

/// Decodes an `npub` or `nsec` into its raw 32 bytes.
///
/// The prefix must match `role` and the payload length is checked before
/// bech32 decoding is attempted.
///
/// # Errors
///
/// Returns [`NostrError::InvalidEncoding`] if the prefix, length or bech32
/// data is wrong.
pub fn decode_encoded_key(encoded: &str, role: KeyRole) -> Result<Zeroizing<[u8; 32]>> {
    if !encoded.starts_with(role.prefix()) {
        return Err(NostrError::InvalidEncoding(format!(
            "expected {role} prefix"
        )));
    }
    if !matches_encoded_pattern(encoded, role) {
        return Err(NostrError::InvalidEncoding(format!(
            "{role} must be followed by {ENCODED_KEY_PAYLOAD_LEN} alphanumeric characters"
        )));
    }

    let bytes = match role {
        KeyRole::Public => PublicKey::from_bech32(encoded)
            .map_err(|e| NostrError::InvalidEncoding(e.to_string()))?
            .to_bytes(),
        KeyRole::Private => SecretKey::from_bech32(encoded)
            .map_err(|e| NostrError::InvalidEncoding(e.to_string()))?
            .secret_bytes(),
    };

    Ok(Zeroizing::new(bytes))
}

/// Decodes an `npub` into the 64-character hex form used in event `pubkey`
/// fields.
///
/// # Errors
///
/// Returns [`NostrError::InvalidEncoding`] if the npub is malformed.
pub fn npub_to_hex(npub: &str) -> Result<String> {
    let bytes = decode_encoded_key(npub, KeyRole::Public)?;
    Ok(hex::encode(*bytes))
}

/// Parses a hex public key into the `nostr` crate type.
///
/// # Errors
///
/// Returns [`NostrError::InvalidEncoding`] if the hex is not a valid x-only key.
pub fn parse_pubkey_hex(pubkey_hex: &str) -> Result<PublicKey> {
    PublicKey::from_hex(pubkey_hex).map_err(|e| NostrError::InvalidEncoding(e.to_string()))
}
