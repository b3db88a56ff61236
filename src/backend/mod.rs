//! Client for the marketplace backend that signs and publishes listings.
//!
//! # Trust
//!
//! This path sends the user's private key (hex) to the backend, which signs
//! and publishes on the user's behalf. It is only taken when the
//! application configures a backend URL and the user signed in with a local
//! key. Without a backend URL, local-key listings are signed in process.

mod error;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

pub use error::{BackendError, BackendResult};

use crate::nostr::{EventDraft, IdentityKeypair};
use crate::relay::RelaySet;

/// Path of the listing endpoint, relative to the backend base URL.
pub const POST_EVENT_PATH: &str = "/api/nostr/post-event";

#[derive(Serialize)]
struct PostEventRequest<'a> {
    pubkey: &'a str,
    privkey: &'a str,
    created_at: i64,
    kind: u16,
    tags: &'a [Vec<String>],
    content: &'a str,
    relays: &'a [String],
}

#[derive(Debug, Deserialize)]
struct PostEventResponse {
    id: Option<String>,
}

/// Client for `POST {base}/api/nostr/post-event`.
#[derive(Debug, Clone)]
pub struct ListingBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl ListingBackend {
    /// Creates a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{POST_EVENT_PATH}", base_url.trim_end_matches('/')),
        }
    }

    /// The full endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends `draft` with the author's key and relay set to the backend and
    /// returns the id of the event it published.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with a
    /// non-success status, or the response carries no id.
    pub async fn post_event(
        &self,
        keypair: &IdentityKeypair,
        draft: &EventDraft,
        relays: &RelaySet,
    ) -> BackendResult<String> {
        let pubkey = keypair.pubkey_hex();
        let secret = keypair.secret_bytes();
        let privkey = Zeroizing::new(hex::encode(&*secret));
        let body = request_body(&pubkey, &privkey, draft, relays);

        debug!("posting kind {} through {}", draft.kind, self.endpoint);
        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: PostEventResponse = response.json().await?;
        let id = parsed
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BackendError::InvalidResponse("missing id".to_string()))?;

        info!("backend published event {id}");
        Ok(id)
    }
}

fn request_body<'a>(
    pubkey: &'a str,
    privkey: &'a str,
    draft: &'a EventDraft,
    relays: &'a RelaySet,
) -> PostEventRequest<'a> {
    PostEventRequest {
        pubkey,
        privkey,
        created_at: draft.created_at,
        kind: draft.kind,
        tags: &draft.tags,
        content: &draft.content,
        relays: relays.as_slice(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nostr::listing_draft;

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(
            ListingBackend::new("https://shopstr.store/").endpoint(),
            "https://shopstr.store/api/nostr/post-event"
        );
        assert_eq!(
            ListingBackend::new("http://127.0.0.1:3000").endpoint(),
            "http://127.0.0.1:3000/api/nostr/post-event"
        );
    }

    #[test]
    fn request_body_carries_listing_and_relays() {
        let draft = listing_draft(
            vec![
                vec!["d".to_string(), "item1".to_string()],
                vec!["summary".to_string(), "desc".to_string()],
            ],
            1_700_000_000,
        );
        let relays = RelaySet::new(["wss://a", "wss://b"]);

        let body = request_body("ab", "cd", &draft, &relays);
        let json: serde_json::Value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "pubkey": "ab",
                "privkey": "cd",
                "created_at": 1_700_000_000,
                "kind": 30402,
                "tags": [["d", "item1"], ["summary", "desc"], ["published_at", "1700000000"]],
                "content": "desc",
                "relays": ["wss://a", "wss://b"],
            })
        );
    }

    #[test]
    fn response_without_id_parses() {
        let parsed: PostEventResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.id.is_none());
    }
}
