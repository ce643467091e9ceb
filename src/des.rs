//! DES-CBC text envelope.
//!
//! Legacy cipher kept for compatibility with existing ciphertext. The key
//! is never used raw: a validated base key plus an 8-byte salt go through
//! PBKDF2 (see [`crate::kdf`]) and the derived 8-byte key drives DES in
//! CBC mode with PKCS7 padding. Output is standard padded base64.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use zeroize::Zeroize;

use crate::error::{CryptoError, Result};
use crate::kdf::{self, DERIVED_KEY_LEN};
use crate::keygen::{DES_IV_LEN, SALT_LEN};
use crate::policy;

type DesCbcEnc = cbc::Encryptor<des::Des>;
type DesCbcDec = cbc::Decryptor<des::Des>;

/// Minimum base-key length for the DES envelope.
pub const MIN_BASE_KEY_LEN: usize = 8;

/// Fallback IV used when the caller supplies none. Prefer a fresh one from
/// [`crate::keygen::generate_des_iv`], stored somewhere safe.
pub const DEFAULT_IV: [u8; DES_IV_LEN] = [171, 182, 193, 144, 165, 157, 148, 199];

/// Fallback salt used when the caller supplies none. Prefer a fresh one
/// from [`crate::keygen::generate_salt`].
pub const DEFAULT_SALT: [u8; SALT_LEN] = [0x12, 0x23, 0x45, 0x56, 0x78, 0xff, 0xab, 0x89];

/// An instance-scoped DES envelope. One envelope owns one derived key/IV
/// set; independent instances with different keys may coexist. Immutable
/// after construction, key material zeroized on drop.
pub struct DesCipher {
    key: [u8; DERIVED_KEY_LEN],
    salt: [u8; SALT_LEN],
    iv: [u8; DES_IV_LEN],
}

impl Drop for DesCipher {
    fn drop(&mut self) {
        self.key.zeroize();
        self.salt.zeroize();
    }
}

impl DesCipher {
    /// Validates the base key, fixes up salt and IV, and derives the DES
    /// key. Fails without creating any state if the base key is shorter
    /// than [`MIN_BASE_KEY_LEN`] or misses a digit, an uppercase or a
    /// lowercase letter, or if a supplied salt or IV is not exactly 8
    /// bytes.
    pub fn new(base_key: &str, iv: Option<&[u8]>, salt: Option<&[u8]>) -> Result<Self> {
        policy::validate_passphrase(base_key, MIN_BASE_KEY_LEN)?;
        let iv = fixed_or_default(iv, DEFAULT_IV, "IV")?;
        let salt = fixed_or_default(salt, DEFAULT_SALT, "salt")?;
        let key = kdf::derive_key(base_key, &salt);

        Ok(Self { key, salt, iv })
    }

    /// Encrypts UTF-8 text to base64 ciphertext. Empty input is encrypted
    /// as the empty byte sequence, yielding one padding block.
    pub fn encrypt(&self, text: &str) -> Result<String> {
        let ciphertext = DesCbcEnc::new(&self.key.into(), &self.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(text.as_bytes());
        Ok(BASE64.encode(ciphertext))
    }

    /// Decrypts base64 ciphertext back to UTF-8 text. Malformed base64,
    /// corrupted padding, or non-UTF-8 plaintext all fail with
    /// [`CryptoError::Decryption`].
    pub fn decrypt(&self, text: &str) -> Result<String> {
        let ciphertext = BASE64.decode(text).map_err(|_| CryptoError::Decryption)?;
        let plaintext = DesCbcDec::new(&self.key.into(), &self.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CryptoError::Decryption)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::Decryption)
    }
}

/// Length-checks an optional caller-supplied buffer and copies it into a
/// fixed 8-byte array, or falls back to the default.
fn fixed_or_default(buf: Option<&[u8]>, default: [u8; 8], what: &str) -> Result<[u8; 8]> {
    match buf {
        Some(buf) => {
            policy::require_len(buf, 8, what)?;
            let mut fixed = [0u8; 8];
            fixed.copy_from_slice(buf);
            Ok(fixed)
        }
        None => Ok(default),
    }
}

/// The process-scoped DES envelope: one key-material set shared by the
/// whole process, initializable exactly once.
pub mod shared {
    use std::sync::OnceLock;

    use super::*;

    static SHARED: OnceLock<DesCipher> = OnceLock::new();

    /// Initializes the shared envelope. Validation and derivation run
    /// before the slot is claimed, so a failed call leaves the envelope
    /// untouched and retryable. A second successful claim is impossible:
    /// re-keying would silently invalidate existing ciphertext, so the
    /// call fails with [`CryptoError::AlreadyInitialized`] instead.
    pub fn initialize(base_key: &str, iv: Option<&[u8]>, salt: Option<&[u8]>) -> Result<()> {
        let cipher = DesCipher::new(base_key, iv, salt)?;
        SHARED
            .set(cipher)
            .map_err(|_| CryptoError::AlreadyInitialized)
    }

    /// Returns `true` once `initialize` has succeeded.
    pub fn is_initialized() -> bool {
        SHARED.get().is_some()
    }

    /// Encrypts with the shared key material. Empty input short-circuits
    /// to an empty string.
    pub fn encrypt(text: &str) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        SHARED.get().ok_or(CryptoError::NotInitialized)?.encrypt(text)
    }

    /// Decrypts with the shared key material. Empty input short-circuits
    /// to an empty string.
    pub fn decrypt(text: &str) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        SHARED.get().ok_or(CryptoError::NotInitialized)?.decrypt(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_with_defaults() {
        let cipher = DesCipher::new("Secr3tPass", None, None).unwrap();
        let encrypted = cipher.encrypt("hello world").unwrap();
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "hello world");
    }

    #[test]
    fn fixed_material_yields_deterministic_ciphertext() {
        let iv = [171, 182, 193, 144, 165, 157, 148, 199];
        let salt = [0x12, 0x23, 0x45, 0x56, 0x78, 0xff, 0xab, 0x89];

        let a = DesCipher::new("Secr3tPass", Some(&iv), Some(&salt)).unwrap();
        let b = DesCipher::new("Secr3tPass", Some(&iv), Some(&salt)).unwrap();

        let ca = a.encrypt("hello world").unwrap();
        let cb = b.encrypt("hello world").unwrap();
        assert_eq!(ca, cb);
        assert_eq!(b.decrypt(&ca).unwrap(), "hello world");
    }

    #[test]
    fn independent_instances_with_different_keys() {
        let a = DesCipher::new("Secr3tPassA", None, None).unwrap();
        let b = DesCipher::new("Secr3tPassB", None, None).unwrap();

        let encrypted = a.encrypt("payload").unwrap();
        assert_ne!(encrypted, b.encrypt("payload").unwrap());
        // the wrong key either trips the padding check or yields garbage
        if let Ok(text) = b.decrypt(&encrypted) {
            assert_ne!(text, "payload");
        }
        assert_eq!(a.decrypt(&encrypted).unwrap(), "payload");
    }

    #[test]
    fn empty_input_encrypts_to_one_padding_block() {
        let cipher = DesCipher::new("Secr3tPass", None, None).unwrap();
        let encrypted = cipher.encrypt("").unwrap();
        // 8-byte padding block -> 12 base64 chars
        assert_eq!(BASE64.decode(&encrypted).unwrap().len(), 8);
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "");
    }

    #[test]
    fn weak_base_key_is_rejected() {
        assert!(DesCipher::new("", None, None).is_err());
        assert!(DesCipher::new("Short1a", None, None).is_err());
        assert!(DesCipher::new("nodigitshere", None, None).is_err());
        assert!(DesCipher::new("n0uppercase", None, None).is_err());
        assert!(DesCipher::new("N0LOWERCASE", None, None).is_err());
    }

    #[test]
    fn wrong_length_iv_or_salt_is_rejected() {
        assert!(DesCipher::new("Secr3tPass", Some(&[0u8; 7]), None).is_err());
        assert!(DesCipher::new("Secr3tPass", Some(&[0u8; 9]), None).is_err());
        assert!(DesCipher::new("Secr3tPass", None, Some(&[0u8; 7])).is_err());
        assert!(DesCipher::new("Secr3tPass", None, Some(&[0u8; 9])).is_err());
    }

    #[test]
    fn unicode_text_roundtrips() {
        let cipher = DesCipher::new("Secr3tPass", None, None).unwrap();
        let text = "caf\u{e9} \u{1f512} \u{4f60}\u{597d}";
        let encrypted = cipher.encrypt(text).unwrap();
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), text);
    }

    #[test]
    fn malformed_base64_fails_decryption() {
        let cipher = DesCipher::new("Secr3tPass", None, None).unwrap();
        assert!(matches!(
            cipher.decrypt("not valid base64!!!"),
            Err(CryptoError::Decryption)
        ));
    }

    #[test]
    fn truncated_ciphertext_fails_decryption() {
        let cipher = DesCipher::new("Secr3tPass", None, None).unwrap();
        let encrypted = cipher.encrypt("hello world").unwrap();
        let mut raw = BASE64.decode(&encrypted).unwrap();
        raw.truncate(raw.len() - 1);
        assert!(cipher.decrypt(&BASE64.encode(raw)).is_err());
    }

    // The shared envelope is process-wide state; all its transitions are
    // exercised in one test to keep the ordering deterministic.
    #[test]
    fn shared_envelope_initializes_exactly_once() {
        assert!(matches!(
            shared::encrypt("too early"),
            Err(CryptoError::NotInitialized)
        ));
        assert!(matches!(
            shared::decrypt("dG9vIGVhcmx5"),
            Err(CryptoError::NotInitialized)
        ));
        assert!(!shared::is_initialized());

        // a failing initialize must not claim the slot
        assert!(shared::initialize("weak", None, None).is_err());
        assert!(!shared::is_initialized());

        shared::initialize("Secr3tPass", None, None).unwrap();
        assert!(shared::is_initialized());

        let encrypted = shared::encrypt("hello world").unwrap();
        assert_eq!(shared::decrypt(&encrypted).unwrap(), "hello world");

        // empty input short-circuits
        assert_eq!(shared::encrypt("").unwrap(), "");
        assert_eq!(shared::decrypt("").unwrap(), "");

        assert!(matches!(
            shared::initialize("An0therKey", None, None),
            Err(CryptoError::AlreadyInitialized)
        ));
    }
}
