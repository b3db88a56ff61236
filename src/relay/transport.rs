//! Per-relay event delivery.
//!
//! [`RelayTransport`] sends one event to one relay and reports whether that
//! relay acknowledged it. The publisher owns fan-out, timeouts and
//! aggregation; a transport only ever sees a single relay.

use async_trait::async_trait;
use log::debug;
use nostr::{Event, JsonUtil, RelayUrl};
use nostr_sdk::Client;

use super::error::{RelayError, RelayResult};
use crate::nostr::SignedEvent;

/// Delivery of a signed event to a single relay.
#[async_trait]
pub trait RelayTransport: Send + Sync + 'static {
    /// Sends `event` to `relay_url` and waits for the relay's answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or the
    /// relay does not accept the event.
    async fn send_event(&self, relay_url: &str, event: &SignedEvent) -> RelayResult<()>;
}

/// Parses a relay URL. Both `wss://` and `ws://` are accepted.
///
/// # Errors
///
/// Returns [`RelayError::InvalidUrl`] if the URL is not a websocket URL.
pub fn parse_relay_url(relay: &str) -> RelayResult<RelayUrl> {
    RelayUrl::parse(relay).map_err(|e| RelayError::InvalidUrl(format!("{relay}: {e}")))
}

/// Converts a signed event into the `nostr` crate's event type.
///
/// # Errors
///
/// Returns [`RelayError::InvalidEvent`] if the event is malformed.
pub fn to_nostr_event(event: &SignedEvent) -> RelayResult<Event> {
    let json = event
        .to_json()
        .map_err(|e| RelayError::InvalidEvent(e.to_string()))?;
    Event::from_json(json).map_err(|e| RelayError::InvalidEvent(e.to_string()))
}

/// Transport backed by `nostr-sdk`.
///
/// Each attempt uses its own short-lived client so that attempts to
/// different relays share no connection state and a slow relay cannot hold
/// up the others.
#[derive(Debug, Default, Clone, Copy)]
pub struct NostrSdkTransport;

impl NostrSdkTransport {
    /// Creates the transport.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RelayTransport for NostrSdkTransport {
    async fn send_event(&self, relay_url: &str, event: &SignedEvent) -> RelayResult<()> {
        let url = parse_relay_url(relay_url)?;
        let event = to_nostr_event(event)?;

        let client = Client::builder().build();
        client
            .add_relay(url.as_str())
            .await
            .map_err(|e| RelayError::Connection {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        client.connect().await;

        debug!("sending event {} to {url}", event.id);
        let result = client.send_event(&event).await;
        client.disconnect().await;

        let output = result.map_err(|e| RelayError::Publish(e.to_string()))?;
        if output.success.contains(&url) {
            return Ok(());
        }

        let reason = output
            .failed
            .get(&url)
            .cloned()
            .unwrap_or_else(|| "no acknowledgment".to_string());
        Err(RelayError::Rejected {
            relay: url.to_string(),
            reason,
        })
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use memory::{MemoryTransport, RelayBehavior};

#[cfg(any(test, feature = "test-utils"))]
mod memory {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::RelayTransport;
    use crate::nostr::SignedEvent;
    use crate::relay::error::{RelayError, RelayResult};

    /// How a scripted relay answers.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RelayBehavior {
        /// Acknowledge immediately.
        Accept,
        /// Acknowledge after a delay.
        AcceptAfter(Duration),
        /// Reject with a reason.
        Reject(String),
        /// Never answer.
        Hang,
    }

    /// In-memory transport with scripted per-relay behavior. Relays without a
    /// script accept.
    #[derive(Debug, Default)]
    pub struct MemoryTransport {
        behaviors: HashMap<String, RelayBehavior>,
        delivered: Mutex<Vec<(String, SignedEvent)>>,
        attempts: Mutex<Vec<String>>,
    }

    impl MemoryTransport {
        /// A transport where every relay accepts.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Scripts the answer of `relay`.
        #[must_use]
        pub fn with_relay(mut self, relay: &str, behavior: RelayBehavior) -> Self {
            self.behaviors.insert(relay.to_string(), behavior);
            self
        }

        /// Events acknowledged so far, with the relay that took each.
        pub async fn delivered(&self) -> Vec<(String, SignedEvent)> {
            self.delivered.lock().await.clone()
        }

        /// Relays that were contacted, in order of contact.
        pub async fn attempts(&self) -> Vec<String> {
            self.attempts.lock().await.clone()
        }
    }

    #[async_trait]
    impl RelayTransport for MemoryTransport {
        async fn send_event(&self, relay_url: &str, event: &SignedEvent) -> RelayResult<()> {
            self.attempts.lock().await.push(relay_url.to_string());

            match self.behaviors.get(relay_url).unwrap_or(&RelayBehavior::Accept) {
                RelayBehavior::Accept => {}
                RelayBehavior::AcceptAfter(delay) => tokio::time::sleep(*delay).await,
                RelayBehavior::Reject(reason) => {
                    return Err(RelayError::Rejected {
                        relay: relay_url.to_string(),
                        reason: reason.clone(),
                    })
                }
                RelayBehavior::Hang => std::future::pending::<()>().await,
            }

            self.delivered
                .lock()
                .await
                .push((relay_url.to_string(), event.clone()));
            Ok(())
        }
    }
}
