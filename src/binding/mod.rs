//! Wallet binding service.
//!
//! Owners prove control of their address by signing a message; only then
//! are funds arriving at their custodial deposit address bridged.
//!
//! # Operations
//! - `provision`: create a deposit address for an owner (unbound)
//! - `bind`: verify the owner's signature and mark the binding bound
//! - `lookup`: public view of a binding, never key material

pub mod verifier;

use alloy::primitives::{Address, Bytes};
use std::sync::Arc;
use thiserror::Error;

use crate::blockchain::SigningCredential;
use crate::observability::metrics;
use crate::registry::{BindingSummary, RegistryError, WalletBinding, WalletBindingRegistry};
use crate::vault::{KeyVault, VaultError};

pub use verifier::SignatureVerifier;

#[derive(Debug, Error)]
pub enum BindError {
    #[error("Invalid address")]
    InvalidAddress,

    #[error("Wallet not found")]
    BindingNotFound,

    #[error("Invalid Signature")]
    InvalidSignature,

    #[error("Wallet already provisioned")]
    AlreadyProvisioned,

    #[error("key vault: {0}")]
    Vault(#[from] VaultError),

    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
}

impl BindError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAddress => "invalid_address",
            Self::BindingNotFound => "binding_not_found",
            Self::InvalidSignature => "invalid_signature",
            Self::AlreadyProvisioned => "already_provisioned",
            Self::Vault(_) => "vault",
            Self::Registry(_) => "registry",
        }
    }

    /// Whether this is a declined request rather than an infrastructure fault.
    pub fn is_declined(&self) -> bool {
        !matches!(self, Self::Vault(_) | Self::Registry(_))
    }
}

pub struct BindingService {
    registry: Arc<dyn WalletBindingRegistry>,
    vault: Arc<dyn KeyVault>,
}

impl BindingService {
    pub fn new(registry: Arc<dyn WalletBindingRegistry>, vault: Arc<dyn KeyVault>) -> Self {
        Self { registry, vault }
    }

    /// Attach the owner's signed `message` to their binding.
    ///
    /// Re-binding with a fresh valid signature overwrites the stored one.
    pub async fn bind(&self, user_address: &str, message: &str, signature: &str) -> Result<(), BindError> {
        let result = self.try_bind(user_address, message, signature).await;
        metrics::record_bind(match &result {
            Ok(()) => "bound",
            Err(e) => e.kind(),
        });
        match &result {
            Ok(()) => tracing::info!(user = user_address, "Wallet bound"),
            Err(e) if e.is_declined() => {
                tracing::info!(user = user_address, kind = e.kind(), "Bind declined")
            }
            Err(e) => tracing::error!(user = user_address, error = %e, "Bind failed"),
        }
        result
    }

    async fn try_bind(&self, user_address: &str, message: &str, signature: &str) -> Result<(), BindError> {
        let user = SignatureVerifier::parse_address(user_address).ok_or(BindError::InvalidAddress)?;

        if self.registry.find_by_user(user).await?.is_none() {
            return Err(BindError::BindingNotFound);
        }

        let signature = SignatureVerifier::decode_signature(signature).ok_or(BindError::InvalidSignature)?;
        if !SignatureVerifier::verify(message, &signature, user) {
            return Err(BindError::InvalidSignature);
        }

        let recorded = self
            .registry
            .record_signature(user, message.to_string(), Bytes::from(signature))
            .await?;
        if !recorded {
            return Err(BindError::BindingNotFound);
        }
        Ok(())
    }

    /// Create a custodial deposit address for `user_address`.
    pub async fn provision(&self, user_address: &str) -> Result<Address, BindError> {
        let user = SignatureVerifier::parse_address(user_address).ok_or(BindError::InvalidAddress)?;
        if self.registry.find_by_user(user).await?.is_some() {
            return Err(BindError::AlreadyProvisioned);
        }

        let credential = SigningCredential::generate();
        let deposit = credential.address();
        let private_key = self.vault.encrypt(credential.secret_bytes().as_slice())?;
        drop(credential);

        match self
            .registry
            .create(WalletBinding::unbound(user, deposit, private_key))
            .await
        {
            Ok(()) => {}
            Err(RegistryError::AlreadyExists(_)) => return Err(BindError::AlreadyProvisioned),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user = %user, deposit = %deposit, "Deposit wallet provisioned");
        Ok(deposit)
    }

    /// Public view of the binding for `user_address`.
    pub async fn lookup(&self, user_address: &str) -> Result<BindingSummary, BindError> {
        let user = SignatureVerifier::parse_address(user_address).ok_or(BindError::InvalidAddress)?;
        self.registry
            .find_by_user(user)
            .await?
            .map(|binding| binding.summary())
            .ok_or(BindError::BindingNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryRegistry;
    use crate::vault::AesKeyVault;
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;

    fn service() -> (BindingService, Arc<InMemoryRegistry>, Arc<AesKeyVault>) {
        let registry = Arc::new(InMemoryRegistry::new(None));
        let vault = Arc::new(AesKeyVault::new([7u8; 32]));
        let service = BindingService::new(registry.clone(), vault.clone());
        (service, registry, vault)
    }

    fn sign(signer: &PrivateKeySigner, message: &str) -> String {
        let signature = signer.sign_message_sync(message.as_bytes()).unwrap();
        format!("0x{}", hex::encode(signature.as_bytes()))
    }

    #[tokio::test]
    async fn test_provision_then_bind() {
        let (service, registry, vault) = service();
        let owner = PrivateKeySigner::random();
        let user = owner.address().to_string();

        let deposit = service.provision(&user).await.unwrap();
        assert!(!service.lookup(&user).await.unwrap().bound);

        // Stored ciphertext decrypts to the deposit key
        let binding = registry.find_by_user(owner.address()).await.unwrap().unwrap();
        assert_eq!(vault.decrypt(&binding.private_key).unwrap().address(), deposit);

        let message = "FlowEDU Wallet Binding";
        service.bind(&user, message, &sign(&owner, message)).await.unwrap();

        let summary = service.lookup(&user).await.unwrap();
        assert!(summary.bound);
        assert_eq!(summary.flow_edu_address, deposit);
    }

    #[tokio::test]
    async fn test_provision_twice() {
        let (service, _, _) = service();
        let user = PrivateKeySigner::random().address().to_string();
        service.provision(&user).await.unwrap();
        assert!(matches!(
            service.provision(&user).await,
            Err(BindError::AlreadyProvisioned)
        ));
    }

    #[tokio::test]
    async fn test_bind_rejections() {
        let (service, _, _) = service();
        let owner = PrivateKeySigner::random();
        let user = owner.address().to_string();
        let message = "msg";

        let err = service.bind("0x123", message, "0x").await.unwrap_err();
        assert!(matches!(err, BindError::InvalidAddress));
        assert_eq!(err.to_string(), "Invalid address");

        let err = service.bind(&user, message, &sign(&owner, message)).await.unwrap_err();
        assert!(matches!(err, BindError::BindingNotFound));
        assert_eq!(err.to_string(), "Wallet not found");

        service.provision(&user).await.unwrap();
        let stranger = PrivateKeySigner::random();
        let err = service.bind(&user, message, &sign(&stranger, message)).await.unwrap_err();
        assert!(matches!(err, BindError::InvalidSignature));
        assert_eq!(err.to_string(), "Invalid Signature");

        let err = service.bind(&user, message, "not-hex").await.unwrap_err();
        assert!(matches!(err, BindError::InvalidSignature));
        assert!(!service.lookup(&user).await.unwrap().bound);
    }

    #[tokio::test]
    async fn test_bind_is_idempotent() {
        let (service, _, _) = service();
        let owner = PrivateKeySigner::random();
        let user = owner.address().to_string();
        service.provision(&user).await.unwrap();

        let signature = sign(&owner, "msg");
        service.bind(&user, "msg", &signature).await.unwrap();
        service.bind(&user, "msg", &signature).await.unwrap();
        assert!(service.lookup(&user).await.unwrap().bound);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(BindError::InvalidSignature.kind(), "invalid_signature");
        assert!(BindError::BindingNotFound.is_declined());
        assert!(!BindError::Vault(VaultError::Decryption).is_declined());
    }
}
