//! Tag builders for Nostr events.
//!
//! - `d` tag: identifier of a parameterized replaceable event
//! - `p` / `e` tags: references to a pubkey or an event (NIP-01)
//! - `a` / `k` / `web` tags: handler recommendations (NIP-89)
//! - `u` / `method` / `payload` tags: HTTP auth (NIP-98)

/// Builder for Nostr event tags.
///
/// # Example
///
/// ```
/// use shopstr_core::nostr::TagBuilder;
///
/// assert_eq!(TagBuilder::d_tag("item1"), vec!["d", "item1"]);
/// assert_eq!(TagBuilder::published_at_tag(1_700_000_000), vec!["published_at", "1700000000"]);
/// ```
pub struct TagBuilder;

impl TagBuilder {
    /// Builds the `d` tag for addressable events.
    #[must_use]
    pub fn d_tag(identifier: &str) -> Vec<String> {
        vec!["d".to_string(), identifier.to_string()]
    }

    /// Builds a `p` tag referencing a hex public key.
    #[must_use]
    pub fn p_tag(pubkey_hex: &str) -> Vec<String> {
        vec!["p".to_string(), pubkey_hex.to_string()]
    }

    /// Builds an `e` tag referencing an event id.
    #[must_use]
    pub fn e_tag(event_id: &str) -> Vec<String> {
        vec!["e".to_string(), event_id.to_string()]
    }

    /// Builds the `published_at` marker appended to listings.
    #[must_use]
    pub fn published_at_tag(created_at: i64) -> Vec<String> {
        vec!["published_at".to_string(), created_at.to_string()]
    }

    /// Builds an `a` tag pointing at an addressable event
    /// (`<kind>:<pubkey>:<d>`), with a relay hint and a platform marker.
    #[must_use]
    pub fn a_tag(kind: u16, pubkey_hex: &str, identifier: &str, relay: &str, marker: &str) -> Vec<String> {
        vec![
            "a".to_string(),
            format!("{kind}:{pubkey_hex}:{identifier}"),
            relay.to_string(),
            marker.to_string(),
        ]
    }

    /// Builds a `k` tag naming a supported event kind.
    #[must_use]
    pub fn k_tag(kind: u16) -> Vec<String> {
        vec!["k".to_string(), kind.to_string()]
    }

    /// Builds a `web` tag: a URL template and the entity type it accepts.
    #[must_use]
    pub fn web_tag(url_template: &str, entity: &str) -> Vec<String> {
        vec!["web".to_string(), url_template.to_string(), entity.to_string()]
    }

    /// Builds the NIP-98 `u` tag (absolute request URL).
    #[must_use]
    pub fn u_tag(url: &str) -> Vec<String> {
        vec!["u".to_string(), url.to_string()]
    }

    /// Builds the NIP-98 `method` tag. The method is upper-cased.
    #[must_use]
    pub fn method_tag(method: &str) -> Vec<String> {
        vec!["method".to_string(), method.to_ascii_uppercase()]
    }

    /// Builds the NIP-98 `payload` tag from the SHA-256 hex of the body.
    #[must_use]
    pub fn payload_tag(sha256_hex: &str) -> Vec<String> {
        vec!["payload".to_string(), sha256_hex.to_string()]
    }
}
