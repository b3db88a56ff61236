//! Nostr event types and the canonical event codec.
//!
//! - [`EventDraft`]: an unsigned event as produced by the builders
//! - [`SignedEvent`]: a complete event with `id`, `pubkey` and `sig`
//! - [`compute_id`]: the NIP-01 content address of an event

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::nostr::error::{NostrError, Result};
use crate::nostr::keys::SECP;

/// Encrypted direct message (NIP-04).
pub const KIND_ENCRYPTED_DIRECT_MESSAGE: u16 = 4;

/// Event deletion request (NIP-09).
pub const KIND_DELETION: u16 = 5;

/// HTTP auth assertion (NIP-98).
pub const KIND_HTTP_AUTH: u16 = 27235;

/// Classified listing, parameterized replaceable (NIP-99).
pub const KIND_CLASSIFIED_LISTING: u16 = 30402;

/// Handler recommendation (NIP-89).
pub const KIND_HANDLER_RECOMMENDATION: u16 = 31989;

/// Handler information (NIP-89).
pub const KIND_HANDLER_INFORMATION: u16 = 31990;

/// Current Unix time in seconds.
#[must_use]
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Serializes the fields covered by the event id.
///
/// The output is the compact JSON array
/// `[0,<pubkey>,<created_at>,<kind>,<tags>,<content>]`, byte-identical to
/// what `JSON.stringify` produces for the same values.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn canonical_serialization(
    pubkey: &str,
    created_at: i64,
    kind: u16,
    tags: &[Vec<String>],
    content: &str,
) -> Result<String> {
    serde_json::to_string(&(0, pubkey, created_at, kind, tags, content)).map_err(NostrError::from)
}

/// Calculates the event id per NIP-01: the lowercase hex SHA-256 of
/// [`canonical_serialization`].
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use shopstr_core::nostr::compute_id;
///
/// let tags = vec![vec!["d".to_string(), "item1".to_string()]];
/// let a = compute_id("ab", 1_700_000_000, 30402, &tags, "desc").unwrap();
/// let b = compute_id("ab", 1_700_000_000, 30402, &tags, "desc").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn compute_id(
    pubkey: &str,
    created_at: i64,
    kind: u16,
    tags: &[Vec<String>],
    content: &str,
) -> Result<String> {
    let serialized = canonical_serialization(pubkey, created_at, kind, tags, content)?;

    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());

    Ok(hex::encode(hasher.finalize()))
}

fn find_tag<'a>(tags: &'a [Vec<String>], name: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.first().map(String::as_str) == Some(name))
        .and_then(|tag| tag.get(1).map(String::as_str))
}

/// An unsigned event. The signer fills in `pubkey`, `id` and `sig`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventDraft {
    /// Unix timestamp when the event was created.
    pub created_at: i64,

    /// Event kind.
    pub kind: u16,

    /// Event tags, kept in caller order.
    pub tags: Vec<Vec<String>>,

    /// Event content.
    pub content: String,
}

impl EventDraft {
    /// Creates a draft from its parts.
    #[must_use]
    pub const fn new(created_at: i64, kind: u16, tags: Vec<Vec<String>>, content: String) -> Self {
        Self {
            created_at,
            kind,
            tags,
            content,
        }
    }

    /// Returns the value of the first tag named `name`.
    #[must_use]
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        find_tag(&self.tags, name)
    }

    /// Computes the id this draft would have when authored by `pubkey`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn id_for(&self, pubkey: &str) -> Result<String> {
        compute_id(pubkey, self.created_at, self.kind, &self.tags, &self.content)
    }

    /// Serializes this draft to JSON, the shape handed to external signers.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(NostrError::from)
    }
}

/// A signed Nostr event ready for relay transmission.
///
/// ```json
/// {
///   "id": "...",           // SHA256 of the canonical serialization
///   "pubkey": "...",       // Author public key
///   "created_at": 123456,
///   "kind": 30402,
///   "tags": [["d", "..."], ["published_at", "..."]],
///   "content": "...",
///   "sig": "..."           // Schnorr signature over id
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedEvent {
    /// Event id (32-byte SHA256 hash, hex-encoded).
    pub id: String,

    /// Author public key (32 bytes, hex-encoded).
    pub pubkey: String,

    /// Unix timestamp when the event was created.
    pub created_at: i64,

    /// Event kind.
    pub kind: u16,

    /// Event tags.
    pub tags: Vec<Vec<String>>,

    /// Event content.
    pub content: String,

    /// Schnorr signature (64 bytes, hex-encoded).
    pub sig: String,
}

impl SignedEvent {
    /// Assembles a signed event from a draft, an author and a signature over
    /// `id`. No verification is performed.
    #[must_use]
    pub fn from_parts(draft: EventDraft, id: String, pubkey: String, sig: String) -> Self {
        Self {
            id,
            pubkey,
            created_at: draft.created_at,
            kind: draft.kind,
            tags: draft.tags,
            content: draft.content,
            sig,
        }
    }

    /// Recomputes the id from this event's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn recompute_id(&self) -> Result<String> {
        compute_id(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        )
    }

    /// Returns the value of the first tag named `name`.
    #[must_use]
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        find_tag(&self.tags, name)
    }

    /// Serializes this event to JSON for transmission.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(NostrError::from)
    }

    /// Deserializes a signed event from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(NostrError::from)
    }

    /// Verifies that `id` matches the fields and that `sig` is a valid
    /// signature by `pubkey` over `id`.
    ///
    /// # Errors
    ///
    /// Returns [`NostrError::InvalidEvent`] for an id mismatch or malformed
    /// fields and [`NostrError::InvalidSignature`] for a bad signature.
    pub fn verify_signature(&self) -> Result<()> {
        use nostr::secp256k1::{schnorr::Signature, Message, XOnlyPublicKey};

        let pubkey_bytes: [u8; 32] = hex::decode(&self.pubkey)?
            .try_into()
            .map_err(|_| NostrError::InvalidEvent("Invalid pubkey length".to_string()))?;
        let pubkey = XOnlyPublicKey::from_slice(&pubkey_bytes)
            .map_err(|e| NostrError::InvalidEvent(format!("Invalid pubkey: {e}")))?;

        let sig_bytes: [u8; 64] = hex::decode(&self.sig)?
            .try_into()
            .map_err(|_| NostrError::InvalidEvent("Invalid signature length".to_string()))?;
        let signature = Signature::from_slice(&sig_bytes)
            .map_err(|e| NostrError::InvalidEvent(format!("Invalid signature: {e}")))?;

        let calculated_id = self.recompute_id()?;
        if !bool::from(calculated_id.as_bytes().ct_eq(self.id.as_bytes())) {
            return Err(NostrError::InvalidEvent("Event ID mismatch".to_string()));
        }

        let id_bytes: [u8; 32] = hex::decode(&self.id)?
            .try_into()
            .map_err(|_| NostrError::InvalidEvent("Invalid ID length".to_string()))?;
        let message = Message::from_digest(id_bytes);

        SECP.verify_schnorr(&signature, &message, &pubkey)
            .map_err(|_| NostrError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nostr::identity::IdentityKeypair;

    const PUBKEY_HEX: &str = "7e7e9c42a91bfef19fa929e5fda1b72e0ebc1a4c1141673e2794234d86addf4e";

    fn tags(pairs: &[(&str, &str)]) -> Vec<Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| vec![(*k).to_string(), (*v).to_string()])
            .collect()
    }

    fn sign(keypair: &IdentityKeypair, draft: EventDraft) -> SignedEvent {
        let pubkey = keypair.pubkey_hex();
        let id = draft.id_for(&pubkey).unwrap();
        let id_bytes: [u8; 32] = hex::decode(&id).unwrap().try_into().unwrap();
        let sig = keypair.sign(&id_bytes).unwrap();
        SignedEvent::from_parts(draft, id, pubkey, sig)
    }

    #[test]
    fn canonical_serialization_is_compact() {
        let serialized = canonical_serialization(
            PUBKEY_HEX,
            1_700_000_000,
            30402,
            &tags(&[("d", "item1")]),
            "desc",
        )
        .unwrap();

        assert_eq!(
            serialized,
            format!(r#"[0,"{PUBKEY_HEX}",1700000000,30402,[["d","item1"]],"desc"]"#)
        );
    }

    #[test]
    fn compute_id_matches_reference_vector() {
        let id = compute_id(
            PUBKEY_HEX,
            1_700_000_000,
            30402,
            &tags(&[
                ("d", "item1"),
                ("summary", "desc"),
                ("published_at", "1700000000"),
            ]),
            "desc",
        )
        .unwrap();

        assert_eq!(
            id,
            "1be094c73aa57dc8d90f22eab19b413a188904e768294121ebed228389da4360"
        );
    }

    #[test]
    fn compute_id_escapes_like_json_stringify() {
        let id = compute_id(PUBKEY_HEX, 1_700_000_000, 1, &[], "line\n\"quote\" \\ é 🙂\t/")
            .unwrap();

        assert_eq!(
            id,
            "ba747b0604c831a05a3fd3511161ac3a52bcd1657f5cf80b1fabd94e0b3bb243"
        );
    }

    #[test]
    fn tag_order_changes_id() {
        let a = compute_id(PUBKEY_HEX, 1, 1, &tags(&[("a", "1"), ("b", "2")]), "").unwrap();
        let b = compute_id(PUBKEY_HEX, 1, 1, &tags(&[("b", "2"), ("a", "1")]), "").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn draft_tag_value_returns_first_match() {
        let draft = EventDraft::new(
            0,
            1,
            tags(&[("summary", "first"), ("summary", "second")]),
            String::new(),
        );
        assert_eq!(draft.tag_value("summary"), Some("first"));
        assert_eq!(draft.tag_value("missing"), None);
    }

    #[test]
    fn draft_tag_value_ignores_nameless_tag() {
        let draft = EventDraft::new(0, 1, vec![vec![], vec!["d".to_string()]], String::new());
        assert_eq!(draft.tag_value("d"), None);
    }

    #[test]
    fn signed_event_verifies() {
        let keypair = IdentityKeypair::generate();
        let event = sign(
            &keypair,
            EventDraft::new(1_700_000_000, 1, tags(&[("t", "x")]), "hello".to_string()),
        );

        assert_eq!(event.id.len(), 64);
        assert_eq!(event.sig.len(), 128);
        assert!(event.verify_signature().is_ok());
    }

    #[test]
    fn tampered_content_fails_verification() {
        let keypair = IdentityKeypair::generate();
        let mut event = sign(
            &keypair,
            EventDraft::new(1_700_000_000, 1, vec![], "hello".to_string()),
        );
        event.content = "goodbye".to_string();

        assert!(matches!(
            event.verify_signature(),
            Err(NostrError::InvalidEvent(_))
        ));
    }

    #[test]
    fn tampered_id_fails_verification() {
        let keypair = IdentityKeypair::generate();
        let mut event = sign(
            &keypair,
            EventDraft::new(1_700_000_000, 1, vec![], "hello".to_string()),
        );
        event.id = "00".repeat(32);

        assert!(matches!(
            event.verify_signature(),
            Err(NostrError::InvalidEvent(_))
        ));
    }

    #[test]
    fn signature_from_other_key_fails_verification() {
        let keypair = IdentityKeypair::generate();
        let other = IdentityKeypair::generate();
        let draft = EventDraft::new(1_700_000_000, 1, vec![], "hello".to_string());

        let mut event = sign(&keypair, draft.clone());
        let forged = sign(&other, draft);
        event.sig = forged.sig;

        assert!(matches!(
            event.verify_signature(),
            Err(NostrError::InvalidSignature)
        ));
    }

    #[test]
    fn malformed_signature_hex_fails() {
        let keypair = IdentityKeypair::generate();
        let mut event = sign(
            &keypair,
            EventDraft::new(1_700_000_000, 1, vec![], String::new()),
        );
        event.sig = "abcd".to_string();

        assert!(event.verify_signature().is_err());
    }

    #[test]
    fn json_roundtrip_preserves_event() {
        let keypair = IdentityKeypair::generate();
        let event = sign(
            &keypair,
            EventDraft::new(1_700_000_000, 5, tags(&[("e", "ab")]), "spam".to_string()),
        );

        let recovered = SignedEvent::from_json(&event.to_json().unwrap()).unwrap();
        assert_eq!(event, recovered);
        assert!(recovered.verify_signature().is_ok());
    }

    #[test]
    fn unix_now_is_recent() {
        assert!(unix_now() > 1_700_000_000);
    }
}
