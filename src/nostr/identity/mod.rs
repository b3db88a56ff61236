//! Key material management.
//!
//! The user's private key is never held in the clear between operations. It
//! lives in local configuration as a passphrase-encrypted blob and is
//! recovered into an [`IdentityKeypair`] only for the duration of one signing
//! or encryption call.

mod blob;
mod keypair;

pub use blob::{decrypt_private_key, encrypt_private_key, validate_passphrase};
pub use keypair::IdentityKeypair;
