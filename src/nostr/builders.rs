//! Drafts for every event kind the marketplace publishes.
//!
//! Builders are pure apart from [`direct_message_draft`], which needs the
//! signer's encryption path for its content. Nothing here signs or sends.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

use super::error::Result;
use super::event::{
    EventDraft, SignedEvent, KIND_CLASSIFIED_LISTING, KIND_DELETION,
    KIND_ENCRYPTED_DIRECT_MESSAGE, KIND_HANDLER_INFORMATION, KIND_HANDLER_RECOMMENDATION,
    KIND_HTTP_AUTH,
};
use super::signer::EventSigner;
use super::tags::TagBuilder;

/// Relay hint carried by the handler recommendation's `a` tag.
pub const HANDLER_RELAY_HINT: &str = "wss://relay.damus.io";

/// URL template of the web handler announced in handler information events.
pub const HANDLER_WEB_TEMPLATE: &str = "https://shopstr.store/<bech-32>";

/// Builds a classified listing (kind 30402).
///
/// `values` become the tags verbatim, followed by
/// `["published_at", "<created_at>"]`. The content is the value of the
/// first `summary` tag, or empty.
///
/// # Example
///
/// ```
/// use shopstr_core::nostr::listing_draft;
///
/// let values = vec![
///     vec!["d".to_string(), "item1".to_string()],
///     vec!["summary".to_string(), "desc".to_string()],
/// ];
/// let draft = listing_draft(values, 1_700_000_000);
/// assert_eq!(draft.content, "desc");
/// assert_eq!(draft.tags.last().unwrap(), &vec!["published_at", "1700000000"]);
/// ```
#[must_use]
pub fn listing_draft(values: Vec<Vec<String>>, created_at: i64) -> EventDraft {
    let mut draft = EventDraft::new(created_at, KIND_CLASSIFIED_LISTING, values, String::new());
    draft.content = draft.tag_value("summary").unwrap_or_default().to_string();
    draft.tags.push(TagBuilder::published_at_tag(created_at));
    draft
}

/// Builds the handler recommendation (kind 31989) that points clients at
/// the marketplace for listings.
#[must_use]
pub fn handler_recommendation_draft(pubkey_hex: &str, d: &str, created_at: i64) -> EventDraft {
    let tags = vec![
        TagBuilder::d_tag(&KIND_CLASSIFIED_LISTING.to_string()),
        TagBuilder::a_tag(
            KIND_HANDLER_INFORMATION,
            pubkey_hex,
            d,
            HANDLER_RELAY_HINT,
            "web",
        ),
    ];
    EventDraft::new(created_at, KIND_HANDLER_RECOMMENDATION, tags, String::new())
}

/// Builds the handler information event (kind 31990) announcing the web
/// handler for listings.
#[must_use]
pub fn handler_information_draft(d: &str, created_at: i64) -> EventDraft {
    let tags = vec![
        TagBuilder::d_tag(d),
        TagBuilder::k_tag(KIND_CLASSIFIED_LISTING),
        TagBuilder::web_tag(HANDLER_WEB_TEMPLATE, "npub"),
    ];
    EventDraft::new(created_at, KIND_HANDLER_INFORMATION, tags, String::new())
}

/// Builds an encrypted direct message (kind 4) to the hex public key
/// `recipient`, encrypting through `signer`.
///
/// # Errors
///
/// Returns an error if the signer cannot encrypt.
pub async fn direct_message_draft(
    signer: &dyn EventSigner,
    recipient: &str,
    message: &str,
    created_at: i64,
) -> Result<EventDraft> {
    let ciphertext = signer.encrypt_direct_message(recipient, message).await?;
    Ok(EventDraft::new(
        created_at,
        KIND_ENCRYPTED_DIRECT_MESSAGE,
        vec![TagBuilder::p_tag(recipient)],
        ciphertext,
    ))
}

/// Builds a deletion request (kind 5) for `event_ids`, in order.
#[must_use]
pub fn deletion_draft(event_ids: &[String], reason: &str, created_at: i64) -> EventDraft {
    let tags = event_ids.iter().map(|id| TagBuilder::e_tag(id)).collect();
    EventDraft::new(created_at, KIND_DELETION, tags, reason.to_string())
}

/// Builds an HTTP auth event (kind 27235) for one request.
///
/// With `payload`, a `payload` tag carries the SHA-256 hex of the body.
#[must_use]
pub fn http_auth_draft(url: &str, method: &str, payload: Option<&[u8]>, created_at: i64) -> EventDraft {
    let mut tags = vec![TagBuilder::u_tag(url), TagBuilder::method_tag(method)];
    if let Some(body) = payload {
        tags.push(TagBuilder::payload_tag(&hex::encode(Sha256::digest(body))));
    }
    EventDraft::new(created_at, KIND_HTTP_AUTH, tags, String::new())
}

/// Encodes a signed HTTP auth event as an `Authorization` header value.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn http_auth_header(event: &SignedEvent) -> Result<String> {
    Ok(format!("Nostr {}", BASE64.encode(event.to_json()?)))
}
