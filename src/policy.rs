//! Composition rules for passphrases and length checks for raw key material.
//!
//! Every envelope runs these gates before deriving or touching a key.
//! A failed check aborts construction entirely; no partial state exists.

use crate::error::{CryptoError, Result};

/// Validates a passphrase or textual key against the composition rules:
/// non-empty, at least `min_len` characters, at least one ASCII digit,
/// one uppercase and one lowercase letter.
pub fn validate_passphrase(candidate: &str, min_len: usize) -> Result<()> {
    if candidate.is_empty() {
        return Err(CryptoError::Validation(
            "the base key can not be null or empty".into(),
        ));
    }
    if candidate.chars().count() < min_len {
        return Err(CryptoError::Validation(format!(
            "the base key must contain {min_len} or more characters"
        )));
    }
    if !candidate.chars().any(|c| c.is_ascii_digit()) {
        return Err(CryptoError::Validation(
            "the base key must contain at least one digit".into(),
        ));
    }
    if !candidate.chars().any(|c| c.is_uppercase()) {
        return Err(CryptoError::Validation(
            "the base key must contain at least one uppercase letter".into(),
        ));
    }
    if !candidate.chars().any(|c| c.is_lowercase()) {
        return Err(CryptoError::Validation(
            "the base key must contain at least one lowercase letter".into(),
        ));
    }
    Ok(())
}

/// Checks that a raw byte parameter (salt or IV) has exactly the required
/// length. No composition rule applies to raw bytes.
pub fn require_len(buf: &[u8], expected: usize, what: &str) -> Result<()> {
    if buf.len() != expected {
        return Err(CryptoError::Validation(format!(
            "the {what} must contain exactly {expected} bytes, got {}",
            buf.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_passphrase() {
        assert!(validate_passphrase("Secr3tPass", 8).is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(validate_passphrase("", 8).is_err());
    }

    #[test]
    fn rejects_too_short() {
        assert!(validate_passphrase("Ab1", 8).is_err());
    }

    #[test]
    fn rejects_missing_digit() {
        let err = validate_passphrase("Secretpass", 8).unwrap_err();
        assert!(err.to_string().contains("digit"));
    }

    #[test]
    fn rejects_missing_uppercase() {
        let err = validate_passphrase("secr3tpass", 8).unwrap_err();
        assert!(err.to_string().contains("uppercase"));
    }

    #[test]
    fn rejects_missing_lowercase() {
        let err = validate_passphrase("SECR3TPASS", 8).unwrap_err();
        assert!(err.to_string().contains("lowercase"));
    }

    #[test]
    fn min_len_is_inclusive() {
        assert!(validate_passphrase("Secr3tPa", 8).is_ok());
        assert!(validate_passphrase("Secr3tP", 8).is_err());
    }

    #[test]
    fn require_len_checks_exact_length() {
        assert!(require_len(&[0u8; 8], 8, "salt").is_ok());
        assert!(require_len(&[0u8; 7], 8, "salt").is_err());
        assert!(require_len(&[0u8; 9], 8, "salt").is_err());
    }
}
