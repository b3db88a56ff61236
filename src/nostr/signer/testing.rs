//! In-process stand-in for an external signing capability.
//!
//! Only compiled for tests and with the `test-utils` feature.

use async_trait::async_trait;

use super::delegated::SigningCapability;
use super::local::finalize_event;
use crate::nostr::encryption::encrypt_nip04;
use crate::nostr::error::{NostrError, Result};
use crate::nostr::event::{EventDraft, SignedEvent};
use crate::nostr::identity::IdentityKeypair;

/// A [`SigningCapability`] that signs with a key held in memory, the way a
/// browser extension would.
#[derive(Debug)]
pub struct KeysCapability {
    keypair: IdentityKeypair,
    decline: bool,
    tamper: bool,
}

impl KeysCapability {
    /// A capability with a fresh random key.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_keypair(IdentityKeypair::generate())
    }

    /// A capability over an existing key.
    #[must_use]
    pub fn from_keypair(keypair: IdentityKeypair) -> Self {
        Self {
            keypair,
            decline: false,
            tamper: false,
        }
    }

    /// Makes every signing request fail as if the user declined.
    #[must_use]
    pub fn declining(mut self) -> Self {
        self.decline = true;
        self
    }

    /// Makes the capability return events whose content no longer matches
    /// the signature.
    #[must_use]
    pub fn tampering(mut self) -> Self {
        self.tamper = true;
        self
    }

    /// The capability's public key in hex.
    #[must_use]
    pub fn pubkey_hex(&self) -> String {
        self.keypair.pubkey_hex()
    }
}

#[async_trait]
impl SigningCapability for KeysCapability {
    async fn sign_event(&self, draft: &EventDraft) -> Result<SignedEvent> {
        if self.decline {
            return Err(NostrError::Signing("user declined".to_string()));
        }
        let mut event = finalize_event(draft.clone(), &self.keypair)?;
        if self.tamper {
            event.content.push_str(" (edited)");
        }
        Ok(event)
    }

    async fn nip04_encrypt(&self, recipient_pubkey: &str, plaintext: &str) -> Result<String> {
        if self.decline {
            return Err(NostrError::Encryption("user declined".to_string()));
        }
        encrypt_nip04(&self.keypair, recipient_pubkey, plaintext)
    }
}
