//! Symmetric and asymmetric text encryption behind one text-in/text-out
//! contract.
//!
//! Three envelopes share the same shape of API:
//!
//! - [`DesCipher`] — legacy DES-CBC over a key derived from a validated
//!   passphrase (PBKDF2), plus a one-time-initializable process-wide
//!   variant in [`des::shared`].
//! - [`AesCipher`] — AES-CBC at 128/192/256 bits, key supplied pre-sized
//!   as base64, no derivation.
//! - [`RsaCipher`] — RSA key pairs (generated or imported) with OAEP or
//!   PKCS#1 v1.5 padding and portable key export.
//!
//! Passphrases are gated by composition rules before any key material is
//! derived; salts and IVs are length-checked; all ciphertext crosses the
//! API as standard padded base64. Generated key material is never
//! persisted here — store what [`keygen`] hands out if you need to
//! decrypt later.

pub mod aes;
pub mod cipher;
pub mod des;
pub mod error;
pub mod kdf;
pub mod keygen;
pub mod policy;
pub mod rsa;

pub use crate::aes::{AesCipher, AesKeySize};
pub use crate::cipher::{Cipher, TextCipher};
pub use crate::des::DesCipher;
pub use crate::error::{CryptoError, Result};
pub use crate::rsa::{RsaCipher, RsaKeySize, RsaPadding, RsaPrivateParts, RsaPublicParts};
