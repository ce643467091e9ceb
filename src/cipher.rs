//! Uniform text-in/text-out capability over the cipher envelopes.
//!
//! Callers that pick an algorithm at runtime go through [`Cipher`] instead
//! of matching on a selector code themselves.

use crate::aes::AesCipher;
use crate::des::DesCipher;
use crate::error::Result;
use crate::rsa::RsaCipher;

/// The common encrypt/decrypt contract every envelope satisfies: UTF-8
/// (or UTF-16 for RSA) text in, base64 ciphertext out, and the inverse.
pub trait TextCipher {
    fn encrypt_text(&self, text: &str) -> Result<String>;
    fn decrypt_text(&self, text: &str) -> Result<String>;
}

impl TextCipher for DesCipher {
    fn encrypt_text(&self, text: &str) -> Result<String> {
        self.encrypt(text)
    }

    fn decrypt_text(&self, text: &str) -> Result<String> {
        self.decrypt(text)
    }
}

impl TextCipher for AesCipher {
    fn encrypt_text(&self, text: &str) -> Result<String> {
        self.encrypt(text)
    }

    fn decrypt_text(&self, text: &str) -> Result<String> {
        self.decrypt(text)
    }
}

impl TextCipher for RsaCipher {
    fn encrypt_text(&self, text: &str) -> Result<String> {
        self.encrypt(text)
    }

    fn decrypt_text(&self, text: &str) -> Result<String> {
        self.decrypt(text)
    }
}

/// A runtime-selected cipher. The RSA variant is boxed: a key pair is much
/// larger than the symmetric envelopes.
pub enum Cipher {
    Des(DesCipher),
    Aes(AesCipher),
    Rsa(Box<RsaCipher>),
}

impl TextCipher for Cipher {
    fn encrypt_text(&self, text: &str) -> Result<String> {
        match self {
            Cipher::Des(c) => c.encrypt_text(text),
            Cipher::Aes(c) => c.encrypt_text(text),
            Cipher::Rsa(c) => c.encrypt_text(text),
        }
    }

    fn decrypt_text(&self, text: &str) -> Result<String> {
        match self {
            Cipher::Des(c) => c.decrypt_text(text),
            Cipher::Aes(c) => c.decrypt_text(text),
            Cipher::Rsa(c) => c.decrypt_text(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aes::AesKeySize;
    use crate::keygen;
    use crate::rsa::{RsaKeySize, RsaPadding};

    #[test]
    fn every_variant_roundtrips_through_the_trait() {
        let ciphers = vec![
            Cipher::Des(DesCipher::new("Secr3tPass", None, None).unwrap()),
            Cipher::Aes(
                AesCipher::new(
                    &keygen::generate_aes_key(AesKeySize::Aes256).unwrap(),
                    None,
                    AesKeySize::Aes256,
                )
                .unwrap(),
            ),
            Cipher::Rsa(Box::new(
                RsaCipher::generate(RsaKeySize::Bit512, RsaPadding::Pkcs1v15).unwrap(),
            )),
        ];

        for cipher in &ciphers {
            let encrypted = cipher.encrypt_text("hello world").unwrap();
            assert_ne!(encrypted, "hello world");
            assert_eq!(cipher.decrypt_text(&encrypted).unwrap(), "hello world");
        }
    }
}
