//! Sealed-box backend.
//!
//! Wraps `crypto_box`'s libsodium-compatible `seal`/`unseal` and the base64
//! encoding the REST API expects.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crypto_box::aead::OsRng;
use crypto_box::{PublicKey, SecretKey};
use tracing::trace;

use crate::core::domain::{EncryptedSecret, RepoPublicKey, SecretEntry};
use crate::error::CipherError;

/// Bytes a sealed box adds to the plaintext (ephemeral key + MAC).
pub const SEAL_OVERHEAD: usize = 32 + 16;

/// Seals secret values for one repository public key
///
/// Holds only the decoded public key and its identifier, so a single
/// instance is shared read-only by every upload worker.
#[derive(Clone)]
pub struct Sealer {
    recipient: PublicKey,
    key_id: String,
}

impl Sealer {
    /// Build a sealer from the key returned by the API
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if the key is not base64 of exactly 32 bytes.
    pub fn new(key: &RepoPublicKey) -> Result<Self, CipherError> {
        let bytes = key.decode()?;

        Ok(Self {
            recipient: PublicKey::from(bytes),
            key_id: key.key_id.clone(),
        })
    }

    /// Identifier of the public key
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Seal raw bytes and return the base64 ciphertext
    ///
    /// A fresh ephemeral keypair is used for every call, so sealing the same
    /// plaintext twice gives different output.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if sealing fails.
    pub fn seal_bytes(&self, plaintext: &[u8]) -> Result<String, CipherError> {
        trace!(plaintext_len = plaintext.len(), "sealing");

        let sealed = self
            .recipient
            .seal(&mut OsRng, plaintext)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        trace!(ciphertext_len = sealed.len(), "sealed");
        Ok(STANDARD.encode(sealed))
    }

    /// Seal one secret entry for upload
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if sealing fails.
    pub fn seal(&self, entry: &SecretEntry) -> Result<EncryptedSecret, CipherError> {
        let encrypted_value = self.seal_bytes(entry.value().as_bytes())?;

        Ok(EncryptedSecret::new(
            entry.name().to_string(),
            self.key_id.clone(),
            encrypted_value,
        ))
    }
}

impl std::fmt::Debug for Sealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sealer")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

/// Open a base64 sealed box with the recipient's secret key
///
/// This is the operation the remote store performs; it is exposed for
/// verification and benchmarks.
///
/// # Errors
///
/// Returns `CipherError::InvalidBase64` or `CipherError::DecryptionFailed`.
pub fn open(ciphertext: &str, secret_key: &SecretKey) -> Result<Vec<u8>, CipherError> {
    let sealed = STANDARD.decode(ciphertext)?;

    secret_key
        .unseal(&sealed)
        .map_err(|e| CipherError::DecryptionFailed(e.to_string()))
}
