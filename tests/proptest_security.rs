//! Property-based tests for security-critical operations.
//!
//! These tests focus on:
//! - Identity keypair handling
//! - The passphrase-encrypted key blob
//! - Encoded key validation and decoding

use proptest::prelude::*;
use shopstr_core::nostr::{
    decode_encoded_key, decrypt_private_key, encrypt_private_key, npub_to_hex,
    validate_npub, validate_nsec, validate_passphrase, IdentityKeypair, KeyRole, NostrError,
};

/// Strategy for valid secret key bytes (non-zero, below curve order)
fn valid_secret_key_strategy() -> impl Strategy<Value = [u8; 32]> {
    // The curve order is FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141;
    // capping every byte at 254 keeps keys below it.
    prop::array::uniform32(1u8..=254u8)
}

/// Strategy for passphrases users actually type
fn passphrase_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9]{1,12}",
        "[a-z]{3,8}-[a-z]{3,8}-[a-z]{3,8}",
        "[\\p{L}\\p{N} !?]{1,30}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // ========================================================================
    // Identity Keypair Properties
    // ========================================================================

    /// Property: Keypair from bytes is deterministic
    #[test]
    fn keypair_from_bytes_is_deterministic(secret in valid_secret_key_strategy()) {
        let kp1 = IdentityKeypair::from_secret_bytes(secret).unwrap();
        let kp2 = IdentityKeypair::from_secret_bytes(secret).unwrap();

        prop_assert_eq!(kp1.pubkey_hex(), kp2.pubkey_hex());
    }

    /// Property: Public key is always 64 lowercase hex characters
    #[test]
    fn pubkey_always_64_hex_chars(secret in valid_secret_key_strategy()) {
        let pubkey = IdentityKeypair::from_secret_bytes(secret).unwrap().pubkey_hex();

        prop_assert_eq!(pubkey.len(), 64);
        prop_assert!(pubkey.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// Property: Signature is always 128 hex characters
    #[test]
    fn signature_always_128_hex_chars(
        secret in valid_secret_key_strategy(),
        message_hash in prop::array::uniform32(0u8..=255u8),
    ) {
        let sig = IdentityKeypair::from_secret_bytes(secret).unwrap().sign(&message_hash);

        prop_assert!(sig.is_ok());
        prop_assert_eq!(sig.unwrap().len(), 128);
    }

    /// Property: npub and nsec encodings pass the validators and decode back
    #[test]
    fn encodings_validate_and_decode(secret in valid_secret_key_strategy()) {
        let keypair = IdentityKeypair::from_secret_bytes(secret).unwrap();
        let npub = keypair.npub().unwrap();
        let nsec = keypair.export_nsec().unwrap();

        prop_assert!(validate_npub(&npub));
        prop_assert!(validate_nsec(&nsec));
        prop_assert!(!validate_npub(&nsec));
        prop_assert!(!validate_nsec(&npub));

        prop_assert_eq!(npub_to_hex(&npub).unwrap(), keypair.pubkey_hex());
        let decoded = decode_encoded_key(&nsec, KeyRole::Private).unwrap();
        prop_assert_eq!(*decoded, secret);
    }

    // ========================================================================
    // Passphrase Blob Properties
    // ========================================================================

    /// Property: The right passphrase always recovers the key
    #[test]
    fn blob_roundtrip_recovers_key(
        secret in valid_secret_key_strategy(),
        passphrase in passphrase_strategy(),
    ) {
        let keypair = IdentityKeypair::from_secret_bytes(secret).unwrap();
        let blob = encrypt_private_key(&keypair.export_nsec().unwrap(), &passphrase).unwrap();

        prop_assert!(blob.starts_with("U2FsdGVkX1"));
        prop_assert!(validate_passphrase(&blob, &passphrase));
        let recovered = decrypt_private_key(&blob, &passphrase).unwrap();
        prop_assert_eq!(recovered.pubkey_hex(), keypair.pubkey_hex());
    }

    /// Property: A different passphrase never yields a key
    #[test]
    fn wrong_passphrase_never_validates(
        secret in valid_secret_key_strategy(),
        passphrase in passphrase_strategy(),
        wrong in passphrase_strategy(),
    ) {
        prop_assume!(passphrase != wrong);

        let keypair = IdentityKeypair::from_secret_bytes(secret).unwrap();
        let blob = encrypt_private_key(&keypair.export_nsec().unwrap(), &passphrase).unwrap();

        prop_assert!(!validate_passphrase(&blob, &wrong));
        prop_assert!(matches!(
            decrypt_private_key(&blob, &wrong),
            Err(NostrError::InvalidPassphrase)
        ));
    }

    /// Property: Encrypting twice uses fresh salt
    #[test]
    fn blob_salt_is_fresh(passphrase in passphrase_strategy()) {
        let nsec = IdentityKeypair::generate().export_nsec().unwrap();

        let a = encrypt_private_key(&nsec, &passphrase).unwrap();
        let b = encrypt_private_key(&nsec, &passphrase).unwrap();
        prop_assert_ne!(a, b);
    }

    /// Property: Arbitrary text never decrypts to a key
    #[test]
    fn garbage_blob_is_invalid_passphrase(
        blob in "\\PC{0,80}",
        passphrase in passphrase_strategy(),
    ) {
        prop_assert!(!validate_passphrase(&blob, &passphrase));
    }

    // ========================================================================
    // Validator Properties
    // ========================================================================

    /// Property: The validators accept exactly prefix + 59 alphanumerics
    #[test]
    fn validators_match_pattern(payload in "[a-zA-Z0-9]{59}") {
        let npub = format!("npub{payload}");
        let nsec = format!("nsec{payload}");
        prop_assert!(validate_npub(&npub));
        prop_assert!(validate_nsec(&nsec));
        let with_space = format!(" {npub}");
        prop_assert!(!validate_npub(&with_space));
        let with_extra = format!("{npub}a");
        prop_assert!(!validate_npub(&with_extra));
    }

    /// Property: Wrong lengths are rejected
    #[test]
    fn validators_reject_wrong_length(payload in "[a-zA-Z0-9]{0,58}") {
        let npub = format!("npub{payload}");
        let nsec = format!("nsec{payload}");
        prop_assert!(!validate_npub(&npub));
        prop_assert!(!validate_nsec(&nsec));
    }
}

// Additional test that doesn't use proptest macro for special cases
#[cfg(test)]
mod special_cases {
    use super::*;

    #[test]
    fn keypair_from_curve_order_fails() {
        // secp256k1 curve order (invalid as secret key)
        let curve_order =
            hex::decode("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141")
                .unwrap();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&curve_order);

        assert!(IdentityKeypair::from_secret_bytes(bytes).is_err());
    }

    #[test]
    fn keypair_from_all_zeros_fails() {
        assert!(IdentityKeypair::from_secret_bytes([0u8; 32]).is_err());
    }

    #[test]
    fn empty_passphrase_cannot_encrypt() {
        let nsec = IdentityKeypair::generate().export_nsec().unwrap();
        assert!(matches!(
            encrypt_private_key(&nsec, ""),
            Err(NostrError::MissingPassphrase)
        ));
    }

    #[test]
    fn checksum_is_not_checked_by_validators() {
        // Syntactically valid, but the bech32 checksum is wrong.
        let npub = format!("npub1{}", "q".repeat(58));
        assert!(validate_npub(&npub));
        assert!(matches!(
            npub_to_hex(&npub),
            Err(NostrError::InvalidEncoding(_))
        ));
    }
}
