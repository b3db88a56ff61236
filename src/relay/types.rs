//! Types for relay publishing.

use serde::{Deserialize, Serialize};

/// Relays used when none are configured.
pub const DEFAULT_RELAYS: [&str; 3] = [
    "wss://relay.damus.io",
    "wss://nos.lol",
    "wss://nostr.mutinywallet.com",
];

/// An ordered, de-duplicated set of relay URLs.
///
/// Empty entries are dropped and the first occurrence of a URL keeps its
/// position.
///
/// # Example
///
/// ```
/// use shopstr_core::relay::RelaySet;
///
/// let relays = RelaySet::new(["wss://a.example", "", "wss://b.example", "wss://a.example"]);
/// assert_eq!(relays.as_slice(), ["wss://a.example", "wss://b.example"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RelaySet {
    urls: Vec<String>,
}

impl RelaySet {
    /// Builds a relay set from URLs.
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: Vec<String> = Vec::new();
        for url in urls {
            let url = url.into();
            let trimmed = url.trim();
            if trimmed.is_empty() || set.iter().any(|existing| existing == trimmed) {
                continue;
            }
            set.push(trimmed.to_string());
        }
        Self { urls: set }
    }

    /// The pinned default relays.
    #[must_use]
    pub fn defaults() -> Self {
        Self::new(DEFAULT_RELAYS)
    }

    /// An empty relay set.
    #[must_use]
    pub const fn empty() -> Self {
        Self { urls: Vec::new() }
    }

    /// Returns true if the set has no relays.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Number of relays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Iterates over the relay URLs in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    /// The relay URLs as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.urls
    }

    /// Returns true if `url` is in the set.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }
}

impl Default for RelaySet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl From<Vec<String>> for RelaySet {
    fn from(urls: Vec<String>) -> Self {
        Self::new(urls)
    }
}

impl From<RelaySet> for Vec<String> {
    fn from(set: RelaySet) -> Self {
        set.urls
    }
}

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// The event id that was published.
    pub event_id: String,
    /// The first relay that acknowledged the event.
    pub accepted_by: String,
    /// Relays that failed before the first acknowledgment, with reasons.
    pub failed: Vec<(String, String)>,
    /// Attempts still in flight when the call resolved.
    pub still_pending: usize,
}

impl PublishReceipt {
    /// Returns the total number of relays attempted.
    #[must_use]
    pub fn total_attempted(&self) -> usize {
        1 + self.failed.len() + self.still_pending
    }
}
