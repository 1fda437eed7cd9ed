//! AES-256-GCM key vault.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::blockchain::SigningCredential;
use crate::vault::{EncryptedKey, KeyVault, VaultError};

const NONCE_LEN: usize = 12;

/// Vault key, wiped from memory on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
struct VaultKey([u8; 32]);

/// Vault backed by a single AES-256-GCM key.
pub struct AesKeyVault {
    key: VaultKey,
}

impl AesKeyVault {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key: VaultKey(key) }
    }

    /// Parse a 64-character hex key.
    pub fn from_hex(key_hex: &str) -> Result<Self, VaultError> {
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);
        let bytes = Zeroizing::new(
            hex::decode(key_hex).map_err(|e| VaultError::KeyUnavailable(format!("invalid hex: {}", e)))?,
        );
        let key: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            VaultError::KeyUnavailable(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self::new(key))
    }

    /// Load the key from the environment variable named `var`.
    pub fn from_env(var: &str) -> Result<Self, VaultError> {
        let value = Zeroizing::new(
            std::env::var(var)
                .map_err(|_| VaultError::KeyUnavailable(format!("environment variable {} not set", var)))?,
        );
        Self::from_hex(&value)
    }

    fn cipher(&self) -> Result<Aes256Gcm, VaultError> {
        Aes256Gcm::new_from_slice(&self.key.0)
            .map_err(|e| VaultError::KeyUnavailable(e.to_string()))
    }
}

impl KeyVault for AesKeyVault {
    fn decrypt(&self, ciphertext: &EncryptedKey) -> Result<SigningCredential, VaultError> {
        let raw = ciphertext.as_str();
        let raw = raw.strip_prefix("0x").unwrap_or(raw);
        let encrypted = hex::decode(raw).map_err(|e| VaultError::Malformed(e.to_string()))?;
        if encrypted.len() <= NONCE_LEN {
            return Err(VaultError::Malformed(format!(
                "expected more than {} bytes, got {}",
                NONCE_LEN,
                encrypted.len()
            )));
        }

        let (nonce, body) = encrypted.split_at(NONCE_LEN);
        let plaintext = Zeroizing::new(
            self.cipher()?
                .decrypt(Nonce::from_slice(nonce), body)
                .map_err(|_| VaultError::Decryption)?,
        );

        SigningCredential::from_bytes(&plaintext).map_err(|_| VaultError::InvalidKey)
    }

    fn encrypt(&self, secret: &[u8]) -> Result<EncryptedKey, VaultError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher()?
            .encrypt(&nonce, secret)
            .map_err(|_| VaultError::Encryption)?;

        let mut out = nonce.to_vec();
        out.extend_from_slice(&ciphertext);
        Ok(EncryptedKey::new(hex::encode(out)))
    }
}

impl std::fmt::Debug for AesKeyVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AesKeyVault(<redacted>)")
    }
}
