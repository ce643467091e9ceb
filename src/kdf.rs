//! Password-based key derivation for the DES envelopes.
//!
//! PBKDF2-HMAC-SHA1 with 1000 rounds and an 8-byte output, matching the
//! DES key size. Deterministic: the same base key and salt always yield
//! the same derived key. The AES envelope takes an already-sized key and
//! skips derivation entirely.

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;

use crate::keygen::SALT_LEN;

/// Derived symmetric key length in bytes (the DES key size).
pub const DERIVED_KEY_LEN: usize = 8;

/// PBKDF2 iteration count.
const ROUNDS: u32 = 1000;

/// Derives an 8-byte DES key from a validated base key and an 8-byte salt.
pub fn derive_key(base_key: &str, salt: &[u8; SALT_LEN]) -> [u8; DERIVED_KEY_LEN] {
    let mut key = [0u8; DERIVED_KEY_LEN];
    pbkdf2_hmac::<Sha1>(base_key.as_bytes(), salt, ROUNDS, &mut key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let salt = [0x12, 0x23, 0x45, 0x56, 0x78, 0xff, 0xab, 0x89];
        assert_eq!(derive_key("Secr3tPass", &salt), derive_key("Secr3tPass", &salt));
    }

    #[test]
    fn derivation_matches_known_vector() {
        // PBKDF2-HMAC-SHA1("Secr3tPass", 12 23 45 56 78 ff ab 89, 1000, 8)
        let salt = [0x12, 0x23, 0x45, 0x56, 0x78, 0xff, 0xab, 0x89];
        let key = derive_key("Secr3tPass", &salt);
        assert_eq!(key, [0x74, 0x88, 0xe6, 0x57, 0xe4, 0x33, 0x89, 0x41]);
    }

    #[test]
    fn different_salts_yield_different_keys() {
        let s1 = [1u8; 8];
        let s2 = [2u8; 8];
        assert_ne!(derive_key("Secr3tPass", &s1), derive_key("Secr3tPass", &s2));
    }

    #[test]
    fn different_base_keys_yield_different_keys() {
        let salt = [7u8; 8];
        assert_ne!(derive_key("Secr3tPass", &salt), derive_key("0therPass", &salt));
    }
}
