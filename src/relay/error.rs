//! Error types for relay operations.
//!
//! Per-relay errors describe one attempt; the publisher aggregates them into
//! [`RelayError::AllRelaysFailed`] when no relay acknowledges.

use thiserror::Error;

/// Errors that can occur during relay operations.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The relay set was empty.
    #[error("No relays configured")]
    NoRelaysConfigured,

    /// Every attempt failed.
    #[error("All {} relays failed to accept the event", failures.len())]
    AllRelaysFailed {
        /// Each relay with the reason its attempt failed.
        failures: Vec<(String, String)>,
    },

    /// Invalid relay URL.
    #[error("Invalid relay URL: {0}")]
    InvalidUrl(String),

    /// The event failed verification and was not sent anywhere.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Connection to relay failed.
    #[error("Failed to connect to relay {url}: {reason}")]
    Connection {
        /// The relay URL that failed.
        url: String,
        /// The reason for the failure.
        reason: String,
    },

    /// Event publishing failed.
    #[error("Failed to publish event: {0}")]
    Publish(String),

    /// Relay rejected the event.
    #[error("Relay {relay} rejected event: {reason}")]
    Rejected {
        /// The relay that rejected the event.
        relay: String,
        /// The rejection reason.
        reason: String,
    },

    /// Timeout waiting for operation.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
