//! Shopstr Core Library
//!
//! Identity and event-distribution core for the Shopstr marketplace: builds
//! protocol-conformant signed Nostr events through one of two signing paths
//! (an external signing capability or a passphrase-encrypted local key) and
//! fans them out to the user's relays.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

mod api;
pub mod backend;
pub mod config;
pub mod nostr;
pub mod relay;
pub mod upload;

pub use api::{
    resolve_pubkey, signer_for_mode, CoreError, CoreResult, PostedListing, SentEvent, ShopstrCore,
};
