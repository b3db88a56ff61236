//! Relay publishing.
//!
//! Signed events are fanned out to every relay in the user's relay set. The
//! call resolves on the first relay that acknowledges; it fails only when
//! every relay fails.
//!
//! # Architecture
//!
//! ```text
//! SignedEvent
//!     │  verify id + signature
//!     ▼
//! RelayPublisher ──spawn──► attempt(relay 1) ─┐
//!                ──spawn──► attempt(relay 2) ─┼─► first Ok wins
//!                ──spawn──► attempt(relay n) ─┘
//!                               │
//!                               ▼
//!                        RelayTransport (nostr-sdk Client)
//! ```
//!
//! Each attempt has its own timeout. There is no retry and no backoff.

mod error;
mod publisher;
mod transport;
mod types;

pub use error::{RelayError, RelayResult};
pub use publisher::{RelayPublisher, DEFAULT_TIMEOUT};
pub use transport::{parse_relay_url, to_nostr_event, NostrSdkTransport, RelayTransport};
#[cfg(any(test, feature = "test-utils"))]
pub use transport::{MemoryTransport, RelayBehavior};
pub use types::{PublishReceipt, RelaySet, DEFAULT_RELAYS};
