//! At-rest encryption of provider signing secrets.
//!
//! Every provider secret is sealed with one process-wide AES-256-GCM key
//! that is injected at startup. The stored form is the lowercase hex of
//! `nonce || ciphertext || tag`; a fresh random nonce is drawn for every
//! encryption so two providers with the same secret never share ciphertext.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::Rng;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Required length of the process-wide key in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Length of the GCM nonce prepended to every stored secret.
pub const NONCE_LENGTH: usize = 12;

/// Length of the GCM authentication tag appended by the cipher.
const TAG_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Failures of the secret codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// The configured key does not fit the cipher.
    #[error("Secret key must be {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// The stored value is not a well-formed sealed secret.
    #[error("Stored secret is malformed: {0}")]
    MalformedCiphertext(String),

    /// Authentication failed: wrong key or tampered ciphertext.
    #[error("Stored secret could not be decrypted")]
    Decryption,

    #[error("Secret could not be encrypted")]
    Encryption,
}

// ---------------------------------------------------------------------------
// SecretCodec
// ---------------------------------------------------------------------------

/// Seals and opens provider secrets with the process-wide key.
#[derive(Clone)]
pub struct SecretCodec {
    cipher: Aes256Gcm,
}

impl SecretCodec {
    /// Build a codec from raw key bytes.
    ///
    /// Fails with [`CryptoError::InvalidKeyLength`] unless the key is exactly
    /// [`KEY_LENGTH`] bytes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let invalid = || CryptoError::InvalidKeyLength {
            expected: KEY_LENGTH,
            actual: key.len(),
        };
        if key.len() != KEY_LENGTH {
            return Err(invalid());
        }
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| invalid())?;
        Ok(Self { cipher })
    }

    /// Encrypt a plaintext secret into its stored hex form.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut nonce = [0u8; NONCE_LENGTH];
        rand::rng().fill(&mut nonce);

        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| CryptoError::Encryption)?;

        let mut stored = Vec::with_capacity(NONCE_LENGTH + sealed.len());
        stored.extend_from_slice(&nonce);
        stored.extend_from_slice(&sealed);
        Ok(hex::encode(stored))
    }

    /// Decrypt a stored hex secret back to plaintext.
    ///
    /// The result should live only as long as the signature operation that
    /// needs it.
    pub fn decrypt(&self, stored: &str) -> Result<String, CryptoError> {
        let bytes =
            hex::decode(stored).map_err(|e| CryptoError::MalformedCiphertext(e.to_string()))?;
        if bytes.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(CryptoError::MalformedCiphertext(format!(
                "expected at least {} bytes, got {}",
                NONCE_LENGTH + TAG_LENGTH,
                bytes.len()
            )));
        }

        let (nonce, sealed) = bytes.split_at(NONCE_LENGTH);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CryptoError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::Decryption)
    }
}

impl std::fmt::Debug for SecretCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCodec").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
