//! NIP-04 encryption for direct messages signed with a local key.
//!
//! The shared secret is the ECDH point between the sender's secret key and
//! the recipient's public key; content is AES-256-CBC with a random IV,
//! encoded as `<base64 ciphertext>?iv=<base64 iv>`.

use nostr::nips::nip04;

use crate::nostr::error::{NostrError, Result};
use crate::nostr::identity::IdentityKeypair;
use crate::nostr::keys::parse_pubkey_hex;

/// Encrypts `plaintext` from `sender` to the hex public key `recipient`.
///
/// # Errors
///
/// Returns an error if the recipient key is malformed or encryption fails.
pub fn encrypt_nip04(sender: &IdentityKeypair, recipient_pubkey: &str, plaintext: &str) -> Result<String> {
    let recipient = parse_pubkey_hex(recipient_pubkey)?;
    let secret_key = sender.nostr_secret_key()?;

    nip04::encrypt(&secret_key, &recipient, plaintext)
        .map_err(|e| NostrError::Encryption(e.to_string()))
}

/// Decrypts NIP-04 `ciphertext` received by `receiver` from the hex public
/// key `sender_pubkey`.
///
/// # Errors
///
/// Returns an error if the sender key is malformed or decryption fails.
pub fn decrypt_nip04(receiver: &IdentityKeypair, sender_pubkey: &str, ciphertext: &str) -> Result<String> {
    let sender = parse_pubkey_hex(sender_pubkey)?;
    let secret_key = receiver.nostr_secret_key()?;

    nip04::decrypt(&secret_key, &sender, ciphertext)
        .map_err(|e| NostrError::Decryption(e.to_string()))
}
