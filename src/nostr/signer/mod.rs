//! Event signing.
//!
//! Every signing path implements [`EventSigner`]; callers never branch on the
//! sign-in mode themselves.
//!
//! ```text
//! EventDraft ──► EventSigner ──► SignedEvent
//!                   │
//!        ┌──────────┴───────────┐
//!  DelegatedSigner        LocalKeySigner
//!  (external capability)  (passphrase → blob → key)
//! ```

mod delegated;
mod local;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

use async_trait::async_trait;

pub use delegated::{DelegatedSigner, SigningCapability};
pub use local::{finalize_event, LocalKeySigner};

use crate::config::SignInMode;
use crate::nostr::error::{NostrError, Result};
use crate::nostr::event::{EventDraft, SignedEvent};

/// A capability that turns drafts into signed events and encrypts direct
/// messages for one identity.
#[async_trait]
pub trait EventSigner: Send + Sync {
    /// The sign-in mode this signer serves.
    fn mode(&self) -> SignInMode;

    /// Signs `draft`, producing a complete event.
    ///
    /// # Errors
    ///
    /// Returns an error if key material is unavailable or signing fails.
    async fn sign_event(&self, draft: EventDraft) -> Result<SignedEvent>;

    /// Encrypts a direct message to the hex public key `recipient_pubkey`
    /// (NIP-04).
    ///
    /// # Errors
    ///
    /// Returns an error if key material is unavailable or encryption fails.
    async fn encrypt_direct_message(&self, recipient_pubkey: &str, plaintext: &str) -> Result<String>;

    /// Returns the local-key signer behind this trait object, if any.
    fn as_local_key(&self) -> Option<&LocalKeySigner> {
        None
    }
}

/// Fails fast when `signer` does not serve the configured sign-in mode.
///
/// # Errors
///
/// Returns [`NostrError::SignerMismatch`] on a mismatch.
pub fn ensure_mode(signer: &dyn EventSigner, configured: SignInMode) -> Result<()> {
    let actual = signer.mode();
    if actual == configured {
        Ok(())
    } else {
        Err(NostrError::SignerMismatch {
            expected: configured,
            actual,
        })
    }
}
