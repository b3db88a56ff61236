//! Passphrase-encrypted private key blob.
//!
//! The blob is the OpenSSL "salted" format produced by browser AES helpers
//! when they are given a passphrase instead of a raw key:
//!
//! ```text
//! base64( "Salted__" || salt[8] || AES-256-CBC-PKCS7(nsec) )
//! ```
//!
//! Key and IV come from `EVP_BytesToKey` with MD5 and a single round. The
//! plaintext is the user's `nsec` string.
//!
//! A wrong passphrase does not produce a distinct error from the cipher: it
//! yields a padding failure, garbage bytes, or an empty string. Every one of
//! those outcomes, as well as a malformed blob, is reported as
//! [`NostrError::InvalidPassphrase`].

use aes::Aes256;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use md5::{Digest, Md5};
use rand::RngCore;
use zeroize::Zeroizing;

use super::keypair::IdentityKeypair;
use crate::nostr::error::{NostrError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const SALT_MAGIC: &[u8; 8] = b"Salted__";
const SALT_LEN: usize = 8;
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;

/// `EVP_BytesToKey(MD5, count = 1)` producing a 32-byte key followed by a
/// 16-byte IV.
fn derive_key_iv(passphrase: &[u8], salt: &[u8]) -> Zeroizing<[u8; KEY_LEN + IV_LEN]> {
    let mut derived = Zeroizing::new([0u8; KEY_LEN + IV_LEN]);
    let mut previous: Option<Zeroizing<[u8; 16]>> = None;
    let mut filled = 0;

    while filled < derived.len() {
        let mut hasher = Md5::new();
        if let Some(block) = &previous {
            hasher.update(block.as_slice());
        }
        hasher.update(passphrase);
        hasher.update(salt);
        let mut block = Zeroizing::new([0u8; 16]);
        block.copy_from_slice(&hasher.finalize());

        let take = (derived.len() - filled).min(block.len());
        derived[filled..filled + take].copy_from_slice(&block[..take]);
        filled += take;
        previous = Some(block);
    }

    derived
}

/// Recovers the identity keypair from the encrypted blob.
///
/// # Errors
///
/// Returns [`NostrError::InvalidPassphrase`] if the blob cannot be decrypted
/// into a structurally valid `nsec`.
///
/// # Example
///
/// ```
/// use shopstr_core::nostr::identity::{decrypt_private_key, encrypt_private_key};
/// use shopstr_core::nostr::IdentityKeypair;
///
/// let keypair = IdentityKeypair::generate();
/// let blob = encrypt_private_key(&keypair.export_nsec().unwrap(), "correct-horse").unwrap();
///
/// let recovered = decrypt_private_key(&blob, "correct-horse").unwrap();
/// assert_eq!(recovered.pubkey_hex(), keypair.pubkey_hex());
/// assert!(decrypt_private_key(&blob, "wrong").is_err());
/// ```
pub fn decrypt_private_key(blob: &str, passphrase: &str) -> Result<IdentityKeypair> {
    let raw = STANDARD
        .decode(blob.trim())
        .map_err(|_| NostrError::InvalidPassphrase)?;

    let header_len = SALT_MAGIC.len() + SALT_LEN;
    if raw.len() < header_len + BLOCK_LEN || &raw[..SALT_MAGIC.len()] != SALT_MAGIC {
        return Err(NostrError::InvalidPassphrase);
    }
    let salt = &raw[SALT_MAGIC.len()..header_len];
    let ciphertext = &raw[header_len..];

    let key_iv = derive_key_iv(passphrase.as_bytes(), salt);
    let plaintext = Aes256CbcDec::new_from_slices(&key_iv[..KEY_LEN], &key_iv[KEY_LEN..])
        .map_err(|_| NostrError::InvalidPassphrase)?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| NostrError::InvalidPassphrase)?;

    let nsec = std::str::from_utf8(&plaintext).map_err(|_| NostrError::InvalidPassphrase)?;
    if nsec.is_empty() {
        return Err(NostrError::InvalidPassphrase);
    }

    IdentityKeypair::from_nsec(nsec).map_err(|_| NostrError::InvalidPassphrase)
}

/// Returns true iff [`decrypt_private_key`] would succeed.
///
/// Wrong passphrases and corrupted blobs are indistinguishable here.
#[must_use]
pub fn validate_passphrase(blob: &str, passphrase: &str) -> bool {
    decrypt_private_key(blob, passphrase).is_ok()
}

/// Encrypts an `nsec` under a passphrase with a fresh random salt.
///
/// # Errors
///
/// Returns [`NostrError::InvalidEncoding`] if `nsec` is not a valid private
/// key, and [`NostrError::MissingPassphrase`] if the passphrase is empty.
pub fn encrypt_private_key(nsec: &str, passphrase: &str) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    encrypt_with_salt(nsec, passphrase, salt)
}

fn encrypt_with_salt(nsec: &str, passphrase: &str, salt: [u8; SALT_LEN]) -> Result<String> {
    if passphrase.is_empty() {
        return Err(NostrError::MissingPassphrase);
    }
    // Refuse to store something that could never be decrypted back into a key.
    IdentityKeypair::from_nsec(nsec)?;

    let key_iv = derive_key_iv(passphrase.as_bytes(), &salt);
    let ciphertext = Aes256CbcEnc::new_from_slices(&key_iv[..KEY_LEN], &key_iv[KEY_LEN..])
        .map_err(|e| NostrError::Encryption(e.to_string()))?
        .encrypt_padded_vec_mut::<Pkcs7>(nsec.as_bytes());

    let mut raw = Vec::with_capacity(SALT_MAGIC.len() + SALT_LEN + ciphertext.len());
    raw.extend_from_slice(SALT_MAGIC);
    raw.extend_from_slice(&salt);
    raw.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(raw))
}
