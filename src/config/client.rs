//! Client configuration snapshot.
//!
//! [`ClientConfig::load`] reads every setting the core needs from a
//! [`KeyValueStore`] once. The resulting snapshot is passed by reference
//! into each operation and is never refreshed mid-operation.

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::store::{
    KeyValueStore, ENCRYPTED_PRIVATE_KEY_KEY, MINTS_KEY, NPUB_KEY, RELAYS_KEY, SIGN_IN_KEY,
};
use crate::nostr::identity::{encrypt_private_key, IdentityKeypair};
use crate::nostr::npub_to_hex;
use crate::relay::RelaySet;

/// Mint that used to be the default and is migrated away from on load.
pub const DEPRECATED_MINT: &str = "https://legend.lnbits.com/cashu/api/v1/4gr9Xcmz3XEkUNwiBiQGoC";

/// Default mint.
pub const DEFAULT_MINT: &str = "https://legend.lnbits.com/cashu/api/v1/AptDNABNBXv8gpuywhx6NV";

/// How the user signed in, which fixes the signing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignInMode {
    /// Events are signed by an external capability (browser extension).
    Delegated,
    /// Events are signed with a locally stored, passphrase-encrypted key.
    LocalKey,
}

impl SignInMode {
    /// The value persisted under [`SIGN_IN_KEY`].
    #[must_use]
    pub const fn storage_value(self) -> &'static str {
        match self {
            Self::Delegated => "extension",
            Self::LocalKey => "nsec",
        }
    }

    /// Parses a persisted sign-in value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSignInMode`] for unknown values.
    pub fn from_storage(value: &str) -> ConfigResult<Self> {
        match value {
            "extension" | "delegated" => Ok(Self::Delegated),
            "nsec" | "local-key" => Ok(Self::LocalKey),
            other => Err(ConfigError::InvalidSignInMode(other.to_string())),
        }
    }
}

impl fmt::Display for SignInMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delegated => f.write_str("delegated"),
            Self::LocalKey => f.write_str("local-key"),
        }
    }
}

/// Snapshot of the persisted client settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Sign-in mode, `None` when signed out.
    pub sign_in_mode: Option<SignInMode>,
    /// Passphrase-encrypted private key blob (local-key mode only).
    pub encrypted_private_key: Option<String>,
    /// The user's npub.
    pub npub: Option<String>,
    /// The user's public key in hex, decoded from `npub`.
    pub pubkey_hex: Option<String>,
    /// Relays to publish to.
    pub relays: RelaySet,
    /// Cashu mints.
    pub mints: Vec<String>,
}

impl ClientConfig {
    /// Loads the configuration, applying defaults and migrations.
    ///
    /// - Relays fall back to [`RelaySet::defaults`] when absent or not a JSON
    ///   array of strings; the resulting list is written back.
    /// - Mints fall back to [`DEFAULT_MINT`] when absent, unparsable, or
    ///   still led by [`DEPRECATED_MINT`]; the replacement is written back.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails, the sign-in mode is unknown, or
    /// the stored npub is malformed.
    pub fn load(store: &dyn KeyValueStore) -> ConfigResult<Self> {
        let sign_in_mode = store
            .get(SIGN_IN_KEY)?
            .filter(|value| !value.is_empty())
            .map(|value| SignInMode::from_storage(&value))
            .transpose()?;

        let npub = store.get(NPUB_KEY)?.filter(|value| !value.is_empty());
        let pubkey_hex = npub
            .as_deref()
            .map(npub_to_hex)
            .transpose()
            .map_err(|e| ConfigError::InvalidEncoding(e.to_string()))?;

        let encrypted_private_key = store
            .get(ENCRYPTED_PRIVATE_KEY_KEY)?
            .filter(|value| !value.is_empty());

        let relays = Self::load_relays(store)?;
        let mints = Self::load_mints(store)?;

        Ok(Self {
            sign_in_mode,
            encrypted_private_key,
            npub,
            pubkey_hex,
            relays,
            mints,
        })
    }

    fn load_relays(store: &dyn KeyValueStore) -> ConfigResult<RelaySet> {
        let relays = match store.get(RELAYS_KEY)? {
            None => {
                debug!("no relays configured, using defaults");
                RelaySet::defaults()
            }
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(urls) => RelaySet::new(urls),
                Err(e) => {
                    warn!("stored relay list is unparsable ({e}), using defaults");
                    RelaySet::defaults()
                }
            },
        };

        store.set(RELAYS_KEY, &serde_json::to_string(&relays)?)?;
        Ok(relays)
    }

    fn load_mints(store: &dyn KeyValueStore) -> ConfigResult<Vec<String>> {
        let stored = store
            .get(MINTS_KEY)?
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok());

        match stored {
            Some(mints) if mints.first().map(String::as_str) != Some(DEPRECATED_MINT) => Ok(mints),
            _ => {
                debug!("resetting mints to the default mint");
                let mints = vec![DEFAULT_MINT.to_string()];
                store.set(MINTS_KEY, &serde_json::to_string(&mints)?)?;
                Ok(mints)
            }
        }
    }

    /// Returns the sign-in mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotSignedIn`] when signed out.
    pub fn require_sign_in(&self) -> ConfigResult<SignInMode> {
        self.sign_in_mode.ok_or(ConfigError::NotSignedIn)
    }

    /// Returns the user's hex public key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotSignedIn`] when no npub is stored.
    pub fn require_pubkey_hex(&self) -> ConfigResult<&str> {
        self.pubkey_hex.as_deref().ok_or(ConfigError::NotSignedIn)
    }

    /// Persists a relay list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn save_relays(store: &dyn KeyValueStore, relays: &RelaySet) -> ConfigResult<()> {
        store.set(RELAYS_KEY, &serde_json::to_string(relays)?)
    }

    /// Signs in with a private key: encrypts it under `passphrase` and stores
    /// the blob, the npub and the local-key mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the nsec is invalid, the passphrase is empty, or
    /// the store fails.
    pub fn sign_in_local(store: &dyn KeyValueStore, nsec: &str, passphrase: &str) -> ConfigResult<()> {
        let keypair = IdentityKeypair::from_nsec(nsec)?;
        let npub = keypair.npub()?;
        let blob = encrypt_private_key(nsec, passphrase)?;

        store.set(ENCRYPTED_PRIVATE_KEY_KEY, &blob)?;
        store.set(NPUB_KEY, &npub)?;
        store.set(SIGN_IN_KEY, SignInMode::LocalKey.storage_value())
    }

    /// Signs in through an external signer that reported `npub`.
    ///
    /// # Errors
    ///
    /// Returns an error if the npub is invalid or the store fails.
    pub fn sign_in_delegated(store: &dyn KeyValueStore, npub: &str) -> ConfigResult<()> {
        npub_to_hex(npub).map_err(|e| ConfigError::InvalidEncoding(e.to_string()))?;

        store.remove(ENCRYPTED_PRIVATE_KEY_KEY)?;
        store.set(NPUB_KEY, npub)?;
        store.set(SIGN_IN_KEY, SignInMode::Delegated.storage_value())
    }

    /// Removes the identity from the store. Relays and mints are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn sign_out(store: &dyn KeyValueStore) -> ConfigResult<()> {
        store.remove(SIGN_IN_KEY)?;
        store.remove(NPUB_KEY)?;
        store.remove(ENCRYPTED_PRIVATE_KEY_KEY)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("sign_in_mode", &self.sign_in_mode)
            .field(
                "encrypted_private_key",
                &self.encrypted_private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("npub", &self.npub)
            .field("relays", &self.relays)
            .field("mints", &self.mints)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;
    use crate::nostr::identity::decrypt_private_key;
    use crate::nostr::NostrError;

    const NPUB: &str = "npub10elfcs4fr0l0r8af98jlmgdh9c8tcxjvz9qkw038js35mp4dma8qzvjptg";
    const PUBKEY_HEX: &str = "7e7e9c42a91bfef19fa929e5fda1b72e0ebc1a4c1141673e2794234d86addf4e";
    const NSEC: &str = "nsec1vl029mgpspedva04g90vltkh6fvh240zqtv9k0t9af8935ke9laqsnlfe5";

    #[test]
    fn empty_store_loads_defaults() {
        let store = MemoryStore::new();
        let config = ClientConfig::load(&store).unwrap();

        assert_eq!(config.sign_in_mode, None);
        assert_eq!(config.relays, RelaySet::defaults());
        assert_eq!(config.mints, vec![DEFAULT_MINT.to_string()]);
        assert!(matches!(config.require_sign_in(), Err(ConfigError::NotSignedIn)));
    }

    #[test]
    fn defaults_are_written_back() {
        let store = MemoryStore::new();
        ClientConfig::load(&store).unwrap();

        let relays: Vec<String> =
            serde_json::from_str(&store.get(RELAYS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(relays.len(), 3);
        assert_eq!(
            store.get(MINTS_KEY).unwrap().unwrap(),
            format!(r#"["{DEFAULT_MINT}"]"#)
        );
    }

    #[test]
    fn unparsable_relays_fall_back_to_defaults() {
        let store = MemoryStore::with_entries([(RELAYS_KEY, "{not json")]);
        let config = ClientConfig::load(&store).unwrap();
        assert_eq!(config.relays, RelaySet::defaults());
    }

    #[test]
    fn stored_relays_are_filtered_and_kept() {
        let store = MemoryStore::with_entries([(RELAYS_KEY, r#"["wss://a","","wss://a","wss://b"]"#)]);
        let config = ClientConfig::load(&store).unwrap();

        assert_eq!(config.relays.as_slice(), ["wss://a", "wss://b"]);
        assert_eq!(
            store.get(RELAYS_KEY).unwrap().unwrap(),
            r#"["wss://a","wss://b"]"#
        );
    }

    #[test]
    fn explicit_empty_relay_list_stays_empty() {
        let store = MemoryStore::with_entries([(RELAYS_KEY, "[]")]);
        let config = ClientConfig::load(&store).unwrap();
        assert!(config.relays.is_empty());
    }

    #[test]
    fn deprecated_mint_is_migrated_once() {
        let stored = format!(r#"["{DEPRECATED_MINT}","https://other.mint"]"#);
        let store = MemoryStore::with_entries([(MINTS_KEY, stored.as_str())]);

        let config = ClientConfig::load(&store).unwrap();
        assert_eq!(config.mints, vec![DEFAULT_MINT.to_string()]);

        store
            .set(MINTS_KEY, r#"["https://custom.mint"]"#)
            .unwrap();
        let config = ClientConfig::load(&store).unwrap();
        assert_eq!(config.mints, vec!["https://custom.mint".to_string()]);
    }

    #[test]
    fn sign_in_mode_parsing() {
        assert_eq!(SignInMode::from_storage("extension").unwrap(), SignInMode::Delegated);
        assert_eq!(SignInMode::from_storage("nsec").unwrap(), SignInMode::LocalKey);
        assert!(SignInMode::from_storage("bunker").is_err());
    }

    #[test]
    fn unknown_sign_in_mode_fails_load() {
        let store = MemoryStore::with_entries([(SIGN_IN_KEY, "bunker")]);
        assert!(matches!(
            ClientConfig::load(&store),
            Err(ConfigError::InvalidSignInMode(_))
        ));
    }

    #[test]
    fn npub_is_decoded_to_hex() {
        let store = MemoryStore::with_entries([(SIGN_IN_KEY, "extension"), (NPUB_KEY, NPUB)]);
        let config = ClientConfig::load(&store).unwrap();

        assert_eq!(config.sign_in_mode, Some(SignInMode::Delegated));
        assert_eq!(config.require_pubkey_hex().unwrap(), PUBKEY_HEX);
    }

    #[test]
    fn malformed_npub_fails_load() {
        let store = MemoryStore::with_entries([(NPUB_KEY, "npub1broken")]);
        assert!(matches!(
            ClientConfig::load(&store),
            Err(ConfigError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn sign_in_local_stores_decryptable_blob() {
        let store = MemoryStore::new();
        ClientConfig::sign_in_local(&store, NSEC, "correct-horse").unwrap();

        let config = ClientConfig::load(&store).unwrap();
        assert_eq!(config.sign_in_mode, Some(SignInMode::LocalKey));
        assert_eq!(config.npub.as_deref(), Some(NPUB));

        let blob = config.encrypted_private_key.as_deref().unwrap();
        let keypair = decrypt_private_key(blob, "correct-horse").unwrap();
        assert_eq!(keypair.pubkey_hex(), PUBKEY_HEX);
    }

    #[test]
    fn sign_in_local_with_empty_passphrase_is_missing_passphrase() {
        let store = MemoryStore::new();
        let result = ClientConfig::sign_in_local(&store, NSEC, "");

        assert!(matches!(
            result,
            Err(ConfigError::Nostr(NostrError::MissingPassphrase))
        ));
        assert!(store.get(ENCRYPTED_PRIVATE_KEY_KEY).unwrap().is_none());
        assert!(store.get(SIGN_IN_KEY).unwrap().is_none());
    }

    #[test]
    fn sign_in_local_with_malformed_nsec_is_invalid_encoding() {
        let store = MemoryStore::new();
        let result = ClientConfig::sign_in_local(&store, "nsec1garbage", "correct-horse");

        assert!(matches!(
            result,
            Err(ConfigError::Nostr(NostrError::InvalidEncoding(_)))
        ));
    }

    #[test]
    fn sign_in_delegated_clears_local_key() {
        let store = MemoryStore::new();
        ClientConfig::sign_in_local(&store, NSEC, "correct-horse").unwrap();
        ClientConfig::sign_in_delegated(&store, NPUB).unwrap();

        let config = ClientConfig::load(&store).unwrap();
        assert_eq!(config.sign_in_mode, Some(SignInMode::Delegated));
        assert!(config.encrypted_private_key.is_none());
    }

    #[test]
    fn sign_out_keeps_relays() {
        let store = MemoryStore::new();
        ClientConfig::sign_in_delegated(&store, NPUB).unwrap();
        ClientConfig::save_relays(&store, &RelaySet::new(["wss://mine"])).unwrap();
        ClientConfig::sign_out(&store).unwrap();

        let config = ClientConfig::load(&store).unwrap();
        assert_eq!(config.sign_in_mode, None);
        assert_eq!(config.npub, None);
        assert_eq!(config.relays.as_slice(), ["wss://mine"]);
    }

    #[test]
    fn debug_redacts_key_blob() {
        let store = MemoryStore::new();
        ClientConfig::sign_in_local(&store, NSEC, "correct-horse").unwrap();
        let config = ClientConfig::load(&store).unwrap();

        let blob = config.encrypted_private_key.clone().unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains(&blob));
        assert!(debug_output.contains("<redacted>"));
    }
}
