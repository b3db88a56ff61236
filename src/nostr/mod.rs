//! Nostr protocol layer for the marketplace.
//!
//! # Architecture
//!
//! ```text
//! builders (EventDraft)
//!        ↓
//! signer::EventSigner ── identity (passphrase blob → IdentityKeypair)
//!        ↓
//! event::SignedEvent (id = SHA256 of canonical serialization)
//!        ↓
//! relay::RelayPublisher
//! ```
//!
//! # Security
//!
//! - Private keys are decrypted per operation and zeroized on drop
//! - Event ids are compared in constant time during verification
//! - Signer output is verified before any relay sees it
//!
//! # Example
//!
//! ```
//! use shopstr_core::nostr::{listing_draft, finalize_event, IdentityKeypair};
//!
//! let keypair = IdentityKeypair::generate();
//! let values = vec![vec!["d".to_string(), "item1".to_string()]];
//! let event = finalize_event(listing_draft(values, 1_700_000_000), &keypair).unwrap();
//!
//! assert!(event.verify_signature().is_ok());
//! assert_eq!(event.tag_value("published_at"), Some("1700000000"));
//! ```

mod builders;
mod error;
mod event;
mod keys;
mod tags;

pub mod encryption;
pub mod identity;
pub mod signer;

pub use builders::{
    deletion_draft, direct_message_draft, handler_information_draft,
    handler_recommendation_draft, http_auth_draft, http_auth_header, listing_draft,
    HANDLER_RELAY_HINT, HANDLER_WEB_TEMPLATE,
};
pub use error::{NostrError, Result};
pub use event::{
    canonical_serialization, compute_id, unix_now, EventDraft, SignedEvent,
    KIND_CLASSIFIED_LISTING, KIND_DELETION, KIND_ENCRYPTED_DIRECT_MESSAGE,
    KIND_HANDLER_INFORMATION, KIND_HANDLER_RECOMMENDATION, KIND_HTTP_AUTH,
};
pub use identity::{decrypt_private_key, encrypt_private_key, validate_passphrase, IdentityKeypair};
pub use keys::{
    decode_encoded_key, npub_to_hex, parse_pubkey_hex, validate_npub, validate_nsec, KeyRole,
    ENCODED_KEY_PAYLOAD_LEN,
};
pub use signer::{
    ensure_mode, finalize_event, DelegatedSigner, EventSigner, LocalKeySigner, SigningCapability,
};
pub use tags::TagBuilder;
