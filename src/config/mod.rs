//! Local client configuration.
//!
//! Settings live in an external key-value store owned by the application.
//! The core reads them once per operation into a [`ClientConfig`] snapshot
//! and writes back only the defaults and migrations applied on load, plus
//! explicit sign-in, sign-out and relay changes.

mod client;
mod error;
mod store;

pub use client::{ClientConfig, SignInMode, DEFAULT_MINT, DEPRECATED_MINT};
pub use error::{ConfigError, ConfigResult};
pub use store::{
    KeyValueStore, MemoryStore, ENCRYPTED_PRIVATE_KEY_KEY, MINTS_KEY, NPUB_KEY, RELAYS_KEY,
    SIGN_IN_KEY,
};
