//! Secret types.
//!
//! A plaintext entry read from the dotenv file and its sealed form.

use zeroize::Zeroizing;

/// A plaintext secret loaded from local configuration
///
/// The value is wiped from memory when the entry is dropped.
#[derive(Clone)]
pub struct SecretEntry {
    name: String,
    value: Zeroizing<String>,
}

impl SecretEntry {
    /// Create a new entry from a name and plaintext value
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Zeroizing::new(value.into()),
        }
    }

    /// Secret name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Plaintext value
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for SecretEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretEntry")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Display for SecretEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A sealed secret ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedSecret {
    name: String,
    key_id: String,
    encrypted_value: String,
}

impl EncryptedSecret {
    /// Create a sealed secret
    pub fn new(name: String, key_id: String, encrypted_value: String) -> Self {
        Self {
            name,
            key_id,
            encrypted_value,
        }
    }

    /// Secret name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of the public key the value was sealed with
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Base64 sealed-box ciphertext
    pub fn encrypted_value(&self) -> &str {
        &self.encrypted_value
    }
}
