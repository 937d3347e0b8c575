use crate::test_utils::FAST_SCHEME;
use gatekeeper::auth::{hash_password, verify_password, HashScheme};

// Produced by the system crypt(3) blowfish implementation for "123456".
const LEGACY_BCRYPT_2B: &str = "$2b$04$LKt5o52p1CZL0S1k6EhRm.C4dLPZZ.o8PUebb/XBkPKKdMqmkMZ22";
const LEGACY_BCRYPT_2A: &str = "$2a$04$LKt5o52p1CZL0S1k6EhRm.C4dLPZZ.o8PUebb/XBkPKKdMqmkMZ22";

#[test]
fn test_password_hashing_and_verification() {
    for scheme in [FAST_SCHEME, HashScheme::Scrypt { log_n: 10 }] {
        let hash = hash_password("SecureP@ssw0rd", scheme).unwrap();

        assert_ne!(hash, "SecureP@ssw0rd");
        assert!(verify_password(&hash, "SecureP@ssw0rd"), "{scheme:?}");
        assert!(!verify_password(&hash, "SecureP@ssw0rD"), "{scheme:?}");
    }
}

#[test]
fn test_externally_generated_bcrypt_hashes_verify() {
    assert!(verify_password(LEGACY_BCRYPT_2B, "123456"));
    assert!(verify_password(LEGACY_BCRYPT_2A, "123456"));
    assert!(!verify_password(LEGACY_BCRYPT_2B, "1234567"));
}

#[test]
fn test_hash_never_contains_plaintext() {
    let hash = hash_password("needle-in-hash", FAST_SCHEME).unwrap();
    assert!(!hash.contains("needle-in-hash"));
}
