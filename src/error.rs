use thiserror::Error;

/// Errors surfaced by the cipher envelopes and key-material helpers.
///
/// Validation failures are the caller's fault and fixable before retry;
/// decryption failures mean corrupted data or the wrong key material and
/// are not retryable. Nothing here is transient.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// A passphrase, key, or byte-array parameter failed a precondition.
    /// No cipher state is created when this is returned.
    #[error("{0}")]
    Validation(String),

    /// A cipher operation was attempted on the shared envelope before
    /// `initialize` succeeded.
    #[error("the shared cipher has not been initialized")]
    NotInitialized,

    /// The shared envelope was initialized a second time. Re-keying a
    /// process-wide cipher would silently invalidate everything encrypted
    /// under the previous key, so this is an error rather than an overwrite.
    #[error("the shared cipher can not be initialized more than once")]
    AlreadyInitialized,

    /// Malformed base64, corrupted padding, wrong key/IV, or invalid text
    /// encoding in the decrypted bytes. Deliberately carries no detail.
    #[error("decryption failed: corrupted input or wrong key material")]
    Decryption,

    /// The underlying provider rejected an encryption request, e.g. a
    /// payload exceeding the RSA padding-bounded maximum.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// An imported RSA key pair has halves of different sizes.
    #[error("private key size ({private_bits} bits) differs from public key size ({public_bits} bits)")]
    KeySizeMismatch {
        private_bits: usize,
        public_bits: usize,
    },

    /// Imported RSA key material could not be reconstructed.
    #[error("key import failed: {0}")]
    KeyImport(String),

    /// The underlying provider failed to produce a fresh RSA key pair.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
