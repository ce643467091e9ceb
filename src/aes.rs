//! AES-CBC text envelope.
//!
//! Unlike the DES path, the AES envelope takes an already-sized key
//! (base64 over exactly the key-size bytes) and performs no derivation.
//! Key size is chosen from 128/192/256 bits; the IV is always the 16-byte
//! AES block size. PKCS7 padding, standard padded base64 on the text
//! surface.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};
use crate::keygen::AES_IV_LEN;
use crate::policy;

/// Fallback IV used when the caller supplies none. Prefer a fresh one from
/// [`crate::keygen::generate_aes_iv`], stored somewhere safe.
pub const DEFAULT_IV: [u8; AES_IV_LEN] = [
    0x12, 0x23, 0x45, 0x56, 0x78, 0xff, 0xab, 0x89, 0xff, 0x74, 0x19, 0x33, 0x53, 0x4c, 0xa7, 0xb3,
];

/// Supported AES key sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AesKeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl AesKeySize {
    /// Key size in bits.
    pub fn bits(self) -> usize {
        match self {
            AesKeySize::Aes128 => 128,
            AesKeySize::Aes192 => 192,
            AesKeySize::Aes256 => 256,
        }
    }

    /// Key length in bytes.
    pub fn key_len(self) -> usize {
        self.bits() / 8
    }
}

/// An instance-scoped AES envelope. Immutable after construction; the
/// decoded key bytes are zeroized on drop.
#[derive(Debug)]
pub struct AesCipher {
    key: Zeroizing<Vec<u8>>,
    iv: [u8; AES_IV_LEN],
    size: AesKeySize,
}

impl AesCipher {
    /// Validates the textual key against the composition rules (minimum
    /// length equal to the key size in bytes), decodes it from base64 and
    /// requires the decoded length to match the key size exactly. A
    /// supplied IV must be exactly 16 bytes. Any failure aborts
    /// construction with nothing created.
    pub fn new(key: &str, iv: Option<&[u8]>, size: AesKeySize) -> Result<Self> {
        policy::validate_passphrase(key, size.key_len())?;

        let key_bytes = Zeroizing::new(
            BASE64
                .decode(key)
                .map_err(|_| CryptoError::Validation("the key must be valid base64".into()))?,
        );
        policy::require_len(&key_bytes, size.key_len(), "decoded key")?;

        let iv = match iv {
            Some(buf) => {
                policy::require_len(buf, AES_IV_LEN, "IV")?;
                let mut fixed = [0u8; AES_IV_LEN];
                fixed.copy_from_slice(buf);
                fixed
            }
            None => DEFAULT_IV,
        };

        Ok(Self {
            key: key_bytes,
            iv,
            size,
        })
    }

    /// The configured key size.
    pub fn key_size(&self) -> AesKeySize {
        self.size
    }

    /// Encrypts raw bytes. Empty input yields empty output rather than a
    /// padding block.
    pub fn encrypt_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        let ciphertext = match self.size {
            AesKeySize::Aes128 => cbc::Encryptor::<aes::Aes128>::new_from_slices(&self.key, &self.iv)
                .map_err(|e| CryptoError::Encryption(e.to_string()))?
                .encrypt_padded_vec_mut::<Pkcs7>(bytes),
            AesKeySize::Aes192 => cbc::Encryptor::<aes::Aes192>::new_from_slices(&self.key, &self.iv)
                .map_err(|e| CryptoError::Encryption(e.to_string()))?
                .encrypt_padded_vec_mut::<Pkcs7>(bytes),
            AesKeySize::Aes256 => cbc::Encryptor::<aes::Aes256>::new_from_slices(&self.key, &self.iv)
                .map_err(|e| CryptoError::Encryption(e.to_string()))?
                .encrypt_padded_vec_mut::<Pkcs7>(bytes),
        };
        Ok(ciphertext)
    }

    /// Decrypts raw bytes. Empty input yields empty output.
    pub fn decrypt_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        let plaintext = match self.size {
            AesKeySize::Aes128 => cbc::Decryptor::<aes::Aes128>::new_from_slices(&self.key, &self.iv)
                .map_err(|_| CryptoError::Decryption)?
                .decrypt_padded_vec_mut::<Pkcs7>(bytes)
                .map_err(|_| CryptoError::Decryption)?,
            AesKeySize::Aes192 => cbc::Decryptor::<aes::Aes192>::new_from_slices(&self.key, &self.iv)
                .map_err(|_| CryptoError::Decryption)?
                .decrypt_padded_vec_mut::<Pkcs7>(bytes)
                .map_err(|_| CryptoError::Decryption)?,
            AesKeySize::Aes256 => cbc::Decryptor::<aes::Aes256>::new_from_slices(&self.key, &self.iv)
                .map_err(|_| CryptoError::Decryption)?
                .decrypt_padded_vec_mut::<Pkcs7>(bytes)
                .map_err(|_| CryptoError::Decryption)?,
        };
        Ok(plaintext)
    }

    /// Encrypts UTF-8 text to base64 ciphertext. Empty input yields an
    /// empty string.
    pub fn encrypt(&self, text: &str) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        Ok(BASE64.encode(self.encrypt_bytes(text.as_bytes())?))
    }

    /// Decrypts base64 ciphertext back to UTF-8 text. Empty input yields
    /// an empty string.
    pub fn decrypt(&self, text: &str) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let ciphertext = BASE64.decode(text).map_err(|_| CryptoError::Decryption)?;
        let plaintext = self.decrypt_bytes(&ciphertext)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::Decryption)
    }
}
