//! RSA text envelope.
//!
//! Wraps an RSA key pair with padding-aware encrypt/decrypt. RSA is only
//! meant for small payloads: the maximum is bounded by the key size minus
//! the padding overhead (11 bytes for PKCS#1 v1.5, 42 for OAEP-SHA1), and
//! oversized input is a caller error, not something the envelope resolves.
//! Bulk data belongs in the symmetric envelopes.
//!
//! The string overloads encode text as UTF-16LE so the full character
//! range survives the round-trip; ciphertext is standard padded base64.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::rngs::OsRng;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::error::{CryptoError, Result};

/// Supported RSA modulus sizes. Sizes below 384 bits existed historically
/// but are excluded as insecure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaKeySize {
    Bit384,
    Bit512,
    Bit1024,
    Bit2048,
    Bit4096,
    Bit8192,
    Bit16384,
}

impl RsaKeySize {
    /// Modulus size in bits.
    pub fn bits(self) -> usize {
        match self {
            RsaKeySize::Bit384 => 384,
            RsaKeySize::Bit512 => 512,
            RsaKeySize::Bit1024 => 1024,
            RsaKeySize::Bit2048 => 2048,
            RsaKeySize::Bit4096 => 4096,
            RsaKeySize::Bit8192 => 8192,
            RsaKeySize::Bit16384 => 16384,
        }
    }

    /// Maps a bit length back to the enumerated set, rejecting anything
    /// outside it. Used when inferring the size of imported key material.
    pub fn try_from_bits(bits: usize) -> Result<Self> {
        match bits {
            384 => Ok(RsaKeySize::Bit384),
            512 => Ok(RsaKeySize::Bit512),
            1024 => Ok(RsaKeySize::Bit1024),
            2048 => Ok(RsaKeySize::Bit2048),
            4096 => Ok(RsaKeySize::Bit4096),
            8192 => Ok(RsaKeySize::Bit8192),
            16384 => Ok(RsaKeySize::Bit16384),
            _ => Err(CryptoError::Validation(format!(
                "unsupported RSA key size: {bits} bits"
            ))),
        }
    }
}

/// Padding scheme, fixed at construction. OAEP (SHA-1) for new material;
/// PKCS#1 v1.5 kept for compatibility with legacy ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaPadding {
    Pkcs1v15,
    Oaep,
}

/// Portable public-key representation: base64 big-endian parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsaPublicParts {
    pub modulus: String,
    pub exponent: String,
}

/// Portable private-key representation. Sensitive: holds everything
/// needed to reconstruct the private key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsaPrivateParts {
    pub modulus: String,
    pub exponent: String,
    pub d: String,
    pub primes: Vec<String>,
}

/// An RSA envelope owning a key pair. Created by fresh generation or by
/// importing exported parts; immutable afterwards, no in-place rotation.
#[derive(Debug)]
pub struct RsaCipher {
    private: RsaPrivateKey,
    public: RsaPublicKey,
    size: RsaKeySize,
    padding: RsaPadding,
}

impl RsaCipher {
    /// Generates a fresh key pair at the requested size. The larger sizes
    /// take considerable time.
    pub fn generate(size: RsaKeySize, padding: RsaPadding) -> Result<Self> {
        let mut rng = OsRng;
        let private = RsaPrivateKey::new(&mut rng, size.bits())
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;
        let public = private.to_public_key();
        Ok(Self {
            private,
            public,
            size,
            padding,
        })
    }

    /// Imports an existing key pair from exported parts. The two halves
    /// must have equal modulus lengths, and the inferred bit size must be
    /// one of the supported sizes; nothing is constructed otherwise.
    pub fn from_parts(
        private: &RsaPrivateParts,
        public: &RsaPublicParts,
        padding: RsaPadding,
    ) -> Result<Self> {
        let private_modulus = decode_part(&private.modulus, "private modulus")?;
        let public_modulus = decode_part(&public.modulus, "public modulus")?;

        if private_modulus.len() != public_modulus.len() {
            return Err(CryptoError::KeySizeMismatch {
                private_bits: private_modulus.len() * 8,
                public_bits: public_modulus.len() * 8,
            });
        }
        let size = RsaKeySize::try_from_bits(private_modulus.len() * 8)?;

        let primes = private
            .primes
            .iter()
            .map(|p| Ok(BigUint::from_bytes_be(&decode_part(p, "prime")?)))
            .collect::<Result<Vec<_>>>()?;
        let private_key = RsaPrivateKey::from_components(
            BigUint::from_bytes_be(&private_modulus),
            BigUint::from_bytes_be(&decode_part(&private.exponent, "public exponent")?),
            BigUint::from_bytes_be(&decode_part(&private.d, "private exponent")?),
            primes,
        )
        .map_err(|e| CryptoError::KeyImport(e.to_string()))?;

        let public_key = RsaPublicKey::new_with_max_size(
            BigUint::from_bytes_be(&public_modulus),
            BigUint::from_bytes_be(&decode_part(&public.exponent, "public exponent")?),
            RsaKeySize::Bit16384.bits(),
        )
        .map_err(|e| CryptoError::KeyImport(e.to_string()))?;

        Ok(Self {
            private: private_key,
            public: public_key,
            size,
            padding,
        })
    }

    /// The key size, inferred from the modulus for imported pairs.
    pub fn key_size(&self) -> RsaKeySize {
        self.size
    }

    /// The padding scheme chosen at construction.
    pub fn padding(&self) -> RsaPadding {
        self.padding
    }

    /// Exports the public half as portable parameters.
    pub fn public_parts(&self) -> RsaPublicParts {
        RsaPublicParts {
            modulus: encode_big(self.public.n()),
            exponent: encode_big(self.public.e()),
        }
    }

    /// Exports the private half. Treat the result as key material: anyone
    /// holding it can decrypt.
    pub fn private_parts(&self) -> RsaPrivateParts {
        RsaPrivateParts {
            modulus: encode_big(self.private.n()),
            exponent: encode_big(self.private.e()),
            d: encode_big(self.private.d()),
            primes: self.private.primes().iter().map(encode_big).collect(),
        }
    }

    /// Encrypts raw bytes with the public key. Empty input yields empty
    /// output. Payloads beyond the padding-bounded maximum fail.
    pub fn encrypt_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        let mut rng = OsRng;
        match self.padding {
            RsaPadding::Pkcs1v15 => self.public.encrypt(&mut rng, Pkcs1v15Encrypt, bytes),
            RsaPadding::Oaep => self.public.encrypt(&mut rng, Oaep::new::<Sha1>(), bytes),
        }
        .map_err(|e| CryptoError::Encryption(e.to_string()))
    }

    /// Decrypts raw bytes with the private key. Padding mismatches and
    /// corrupted input fail without detail.
    pub fn decrypt_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        match self.padding {
            RsaPadding::Pkcs1v15 => self.private.decrypt(Pkcs1v15Encrypt, bytes),
            RsaPadding::Oaep => self.private.decrypt(Oaep::new::<Sha1>(), bytes),
        }
        .map_err(|_| CryptoError::Decryption)
    }

    /// Encrypts text to base64 ciphertext. The text is encoded as UTF-16LE
    /// before encryption. Empty input yields an empty string.
    pub fn encrypt(&self, text: &str) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let bytes: Vec<u8> = text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        Ok(BASE64.encode(self.encrypt_bytes(&bytes)?))
    }

    /// Decrypts base64 ciphertext back to text.
    pub fn decrypt(&self, text: &str) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let ciphertext = BASE64.decode(text).map_err(|_| CryptoError::Decryption)?;
        let plaintext = self.decrypt_bytes(&ciphertext)?;
        if plaintext.len() % 2 != 0 {
            return Err(CryptoError::Decryption);
        }
        let units: Vec<u16> = plaintext
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units).map_err(|_| CryptoError::Decryption)
    }
}

fn encode_big(n: &BigUint) -> String {
    BASE64.encode(n.to_bytes_be())
}

fn decode_part(encoded: &str, what: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded)
        .map_err(|_| CryptoError::KeyImport(format!("{what} is not valid base64")))
}
