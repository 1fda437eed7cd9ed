//! Custodial key vault.
//!
//! Deposit-address keys are stored encrypted in the binding registry and only
//! decrypted for the duration of one executor call.
//!
//! # Security Constraints
//! - The vault key comes from the environment, never from the config file
//! - Plaintext buffers are zeroized after use
//! - Decryption yields a [`SigningCredential`], never raw bytes

pub mod aes;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::SigningCredential;

pub use aes::AesKeyVault;

/// Errors raised by the key vault.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Vault key unavailable: {0}")]
    KeyUnavailable(String),

    #[error("Malformed ciphertext: {0}")]
    Malformed(String),

    #[error("Decryption failed")]
    Decryption,

    #[error("Encryption failed")]
    Encryption,

    #[error("Decrypted key is not a valid signing key")]
    InvalidKey,
}

/// Encrypted signing key as stored in a binding: hex of `nonce || ciphertext`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedKey(String);

impl EncryptedKey {
    pub fn new(ciphertext_hex: impl Into<String>) -> Self {
        Self(ciphertext_hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for EncryptedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EncryptedKey(<redacted>)")
    }
}

/// Decrypts stored ciphertexts into scoped signing credentials.
pub trait KeyVault: Send + Sync {
    /// Decrypt `ciphertext` into a credential the caller must drop when done.
    fn decrypt(&self, ciphertext: &EncryptedKey) -> Result<SigningCredential, VaultError>;

    /// Encrypt raw key material for storage.
    fn encrypt(&self, secret: &[u8]) -> Result<EncryptedKey, VaultError>;
}
