//! Signing with the locally stored, passphrase-encrypted private key.
//!
//! The key is decrypted at the start of every operation and dropped (and
//! zeroized) at the end of it. Nothing is cached between calls.

use async_trait::async_trait;
use log::debug;
use zeroize::Zeroizing;

use super::EventSigner;
use crate::config::SignInMode;
use crate::nostr::encryption::encrypt_nip04;
use crate::nostr::error::{NostrError, Result};
use crate::nostr::event::{EventDraft, SignedEvent};
use crate::nostr::identity::{decrypt_private_key, IdentityKeypair};

/// Computes the id of `draft` authored by `keypair`, signs it and assembles
/// the event.
///
/// # Errors
///
/// Returns an error if serialization or signing fails.
pub fn finalize_event(draft: EventDraft, keypair: &IdentityKeypair) -> Result<SignedEvent> {
    let pubkey = keypair.pubkey_hex();
    let id = draft.id_for(&pubkey)?;

    let id_bytes: [u8; 32] = hex::decode(&id)?
        .try_into()
        .map_err(|_| NostrError::InvalidEvent("Invalid ID length".to_string()))?;
    let sig = keypair.sign(&id_bytes)?;

    Ok(SignedEvent::from_parts(draft, id, pubkey, sig))
}

/// [`EventSigner`] for the local-key sign-in mode.
pub struct LocalKeySigner {
    encrypted_key: String,
    passphrase: Option<Zeroizing<String>>,
}

impl LocalKeySigner {
    /// Creates a signer over the stored blob. An empty passphrase counts as
    /// no passphrase.
    #[must_use]
    pub fn new(encrypted_key: impl Into<String>, passphrase: Option<&str>) -> Self {
        Self {
            encrypted_key: encrypted_key.into(),
            passphrase: passphrase
                .filter(|p| !p.is_empty())
                .map(|p| Zeroizing::new(p.to_string())),
        }
    }

    /// Decrypts the private key for one operation.
    ///
    /// # Errors
    ///
    /// Returns [`NostrError::MissingPassphrase`] without a passphrase and
    /// [`NostrError::InvalidPassphrase`] if decryption fails.
    pub(crate) fn unlock(&self) -> Result<IdentityKeypair> {
        let passphrase = self.passphrase.as_ref().ok_or(NostrError::MissingPassphrase)?;
        decrypt_private_key(&self.encrypted_key, passphrase)
    }

    /// Returns true if the passphrase decrypts the stored key.
    #[must_use]
    pub fn has_valid_passphrase(&self) -> bool {
        self.unlock().is_ok()
    }
}

impl std::fmt::Debug for LocalKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKeySigner")
            .field("has_passphrase", &self.passphrase.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EventSigner for LocalKeySigner {
    fn mode(&self) -> SignInMode {
        SignInMode::LocalKey
    }

    async fn sign_event(&self, draft: EventDraft) -> Result<SignedEvent> {
        let keypair = self.unlock()?;
        debug!("signing kind {} locally", draft.kind);
        finalize_event(draft, &keypair)
    }

    async fn encrypt_direct_message(&self, recipient_pubkey: &str, plaintext: &str) -> Result<String> {
        let keypair = self.unlock()?;
        encrypt_nip04(&keypair, recipient_pubkey, plaintext)
    }

    fn as_local_key(&self) -> Option<&LocalKeySigner> {
        Some(self)
    }
}
