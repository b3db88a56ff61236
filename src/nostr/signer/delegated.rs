//! Signing through an external, already-authorized capability (a NIP-07
//! browser extension or a remote signer).
//!
//! The core performs no cryptography on this path: drafts go out, signed
//! events come back and are used as returned.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::EventSigner;
use crate::config::SignInMode;
use crate::nostr::error::{NostrError, Result};
use crate::nostr::event::{EventDraft, SignedEvent};

/// The external signing capability.
#[async_trait]
pub trait SigningCapability: Send + Sync {
    /// Signs a draft. The capability supplies `pubkey`, `id` and `sig`.
    ///
    /// # Errors
    ///
    /// Returns an error if the user declines or the capability fails.
    async fn sign_event(&self, draft: &EventDraft) -> Result<SignedEvent>;

    /// Encrypts `plaintext` to `recipient_pubkey` with NIP-04.
    ///
    /// # Errors
    ///
    /// Returns an error if the user declines or the capability fails.
    async fn nip04_encrypt(&self, recipient_pubkey: &str, plaintext: &str) -> Result<String>;
}

/// [`EventSigner`] backed by a [`SigningCapability`].
#[derive(Clone)]
pub struct DelegatedSigner {
    capability: Arc<dyn SigningCapability>,
}

impl DelegatedSigner {
    /// Wraps the external capability.
    ///
    /// # Errors
    ///
    /// Returns [`NostrError::ExternalCapabilityUnavailable`] if `capability`
    /// is `None` (for example, no extension is installed).
    pub fn new(capability: Option<Arc<dyn SigningCapability>>) -> Result<Self> {
        capability
            .map(|capability| Self { capability })
            .ok_or(NostrError::ExternalCapabilityUnavailable)
    }
}

impl std::fmt::Debug for DelegatedSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatedSigner").finish_non_exhaustive()
    }
}

#[async_trait]
impl EventSigner for DelegatedSigner {
    fn mode(&self) -> SignInMode {
        SignInMode::Delegated
    }

    async fn sign_event(&self, draft: EventDraft) -> Result<SignedEvent> {
        debug!("requesting external signature for kind {}", draft.kind);
        self.capability.sign_event(&draft).await
    }

    async fn encrypt_direct_message(&self, recipient_pubkey: &str, plaintext: &str) -> Result<String> {
        self.capability.nip04_encrypt(recipient_pubkey, plaintext).await
    }
}
