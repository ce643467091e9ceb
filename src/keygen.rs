//! Random key-material generation.
//!
//! Pure generation utilities over the OS random source. Nothing generated
//! here is persisted; callers must store salts, IVs, and keys themselves if
//! they need to decrypt later.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use getrandom::fill;

use crate::aes::AesKeySize;
use crate::error::{CryptoError, Result};
use crate::policy;

/// Length of a symmetric salt in bytes.
pub const SALT_LEN: usize = 8;
/// Block (and IV) size of the DES family in bytes.
pub const DES_IV_LEN: usize = 8;
/// Block (and IV) size of the AES family in bytes.
pub const AES_IV_LEN: usize = 16;

/// Number of random bytes behind a generated base key (base64-encoded).
const BASE_KEY_LEN: usize = 77;

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| CryptoError::KeyGeneration("OS random generator unavailable".into()))
}

/// Generates an 8-byte salt for key derivation.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}

/// Generates an initialization vector sized for the DES block cipher.
pub fn generate_des_iv() -> Result<[u8; DES_IV_LEN]> {
    let mut iv = [0u8; DES_IV_LEN];
    secure_random(&mut iv)?;
    Ok(iv)
}

/// Generates an initialization vector sized for the AES block cipher.
pub fn generate_aes_iv() -> Result<[u8; AES_IV_LEN]> {
    let mut iv = [0u8; AES_IV_LEN];
    secure_random(&mut iv)?;
    Ok(iv)
}

/// Generates a random base key (passphrase material for the DES envelopes),
/// returned base64-encoded. Re-draws until the encoding happens to satisfy
/// the composition rules, so the result is always accepted by the
/// envelopes; a fresh draw fails them only with tiny probability.
pub fn generate_base_key() -> Result<String> {
    loop {
        let mut bytes = [0u8; BASE_KEY_LEN];
        secure_random(&mut bytes)?;
        let key = BASE64.encode(bytes);
        if policy::validate_passphrase(&key, 0).is_ok() {
            return Ok(key);
        }
    }
}

/// Generates a random AES key of the given size, base64-encoded. The
/// decoded bytes are exactly `size.key_len()` long, as the AES envelope
/// requires, and the encoding is re-drawn until it satisfies the
/// composition rules.
pub fn generate_aes_key(size: AesKeySize) -> Result<String> {
    loop {
        let mut bytes = vec![0u8; size.key_len()];
        secure_random(&mut bytes)?;
        let key = BASE64.encode(&bytes);
        if policy::validate_passphrase(&key, 0).is_ok() {
            return Ok(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salts_are_random() {
        let a = generate_salt().unwrap();
        let b = generate_salt().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn iv_lengths_match_block_sizes() {
        assert_eq!(generate_des_iv().unwrap().len(), 8);
        assert_eq!(generate_aes_iv().unwrap().len(), 16);
    }

    #[test]
    fn base_key_is_base64_over_77_bytes() {
        let key = generate_base_key().unwrap();
        let decoded = BASE64.decode(&key).unwrap();
        assert_eq!(decoded.len(), 77);
    }

    #[test]
    fn generated_keys_pass_composition_rules() {
        let base = generate_base_key().unwrap();
        assert!(policy::validate_passphrase(&base, 8).is_ok());

        let aes = generate_aes_key(AesKeySize::Aes256).unwrap();
        assert!(policy::validate_passphrase(&aes, 32).is_ok());
    }

    #[test]
    fn aes_key_decodes_to_exact_key_length() {
        for size in [AesKeySize::Aes128, AesKeySize::Aes192, AesKeySize::Aes256] {
            let key = generate_aes_key(size).unwrap();
            let decoded = BASE64.decode(&key).unwrap();
            assert_eq!(decoded.len(), size.key_len());
        }
    }
}
