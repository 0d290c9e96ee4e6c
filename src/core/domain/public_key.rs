//! Repository public key.
//!
//! The key GitHub hands out for sealing Actions secrets.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use crate::core::constants::PUBLIC_KEY_LEN;
use crate::error::CipherError;

/// Public key of a repository's secret store, as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoPublicKey {
    /// Identifier sent back with every sealed secret
    pub key_id: String,
    /// Base64-encoded X25519 public key
    pub key: String,
}

impl RepoPublicKey {
    /// Decode the key material
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidBase64` if the key is not base64, or
    /// `CipherError::InvalidKeyLength` if it does not decode to 32 bytes.
    pub fn decode(&self) -> Result<[u8; PUBLIC_KEY_LEN], CipherError> {
        let bytes = STANDARD.decode(self.key.trim())?;
        let actual = bytes.len();

        bytes
            .try_into()
            .map_err(|_| CipherError::InvalidKeyLength {
                expected: PUBLIC_KEY_LEN,
                actual,
            })
    }
}
