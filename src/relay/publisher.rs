//! First-success fan-out of a signed event to a relay set.
//!
//! One attempt per relay is spawned as an independent task. The first
//! acknowledgment resolves the call; the remaining attempts are detached and
//! run to completion in the background. A call fails only when every attempt
//! has failed.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use log::{debug, info, warn};

use super::error::{RelayError, RelayResult};
use super::transport::{NostrSdkTransport, RelayTransport};
use super::types::{PublishReceipt, RelaySet};
use crate::nostr::SignedEvent;

/// Default timeout for a single relay attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Publishes signed events over a [`RelayTransport`].
#[derive(Debug)]
pub struct RelayPublisher<T: RelayTransport = NostrSdkTransport> {
    transport: Arc<T>,
    timeout: Duration,
}

impl Default for RelayPublisher<NostrSdkTransport> {
    fn default() -> Self {
        Self::new(NostrSdkTransport::new())
    }
}

impl<T: RelayTransport> RelayPublisher<T> {
    /// Creates a publisher with the default per-attempt timeout.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_timeout(transport, DEFAULT_TIMEOUT)
    }

    /// Creates a publisher with a custom per-attempt timeout.
    #[must_use]
    pub fn with_timeout(transport: T, timeout: Duration) -> Self {
        Self {
            transport: Arc::new(transport),
            timeout,
        }
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Publishes `event` to every relay in `relays` and resolves on the first
    /// acknowledgment.
    ///
    /// The event is verified before any attempt starts.
    ///
    /// # Errors
    ///
    /// - [`RelayError::NoRelaysConfigured`] if `relays` is empty
    /// - [`RelayError::InvalidEvent`] if the id or signature does not verify
    /// - [`RelayError::AllRelaysFailed`] if no relay acknowledged
    pub async fn publish(&self, relays: &RelaySet, event: &SignedEvent) -> RelayResult<PublishReceipt> {
        if relays.is_empty() {
            return Err(RelayError::NoRelaysConfigured);
        }

        event
            .verify_signature()
            .map_err(|e| RelayError::InvalidEvent(e.to_string()))?;

        let event = Arc::new(event.clone());
        let mut attempts: FuturesUnordered<_> = relays
            .iter()
            .map(|relay| self.spawn_attempt(relay.to_string(), Arc::clone(&event)))
            .collect();

        debug!("publishing {} to {} relays", event.id, attempts.len());

        let mut failures = Vec::new();
        while let Some((relay, joined)) = attempts.next().await {
            let outcome = joined.unwrap_or_else(|e| Err(RelayError::Publish(e.to_string())));
            match outcome {
                Ok(()) => {
                    info!("event {} accepted by {relay}", event.id);
                    return Ok(PublishReceipt {
                        event_id: event.id.clone(),
                        accepted_by: relay,
                        failed: failures,
                        still_pending: attempts.len(),
                    });
                }
                Err(e) => {
                    warn!("relay {relay} failed: {e}");
                    failures.push((relay, e.to_string()));
                }
            }
        }

        Err(RelayError::AllRelaysFailed { failures })
    }

    fn spawn_attempt(
        &self,
        relay: String,
        event: Arc<SignedEvent>,
    ) -> impl std::future::Future<
        Output = (String, Result<RelayResult<()>, tokio::task::JoinError>),
    > {
        let transport = Arc::clone(&self.transport);
        let timeout = self.timeout;
        let url = relay.clone();

        tokio::spawn(async move {
            tokio::time::timeout(timeout, transport.send_event(&url, &event))
                .await
                .unwrap_or_else(|_| Err(RelayError::Timeout(format!("{url} after {timeout:?}"))))
        })
        .map(move |joined| (relay, joined))
    }
}
