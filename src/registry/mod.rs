//! Wallet binding registry.
//!
//! The registry is the system of record for bindings. The core treats it as
//! an external transactional store reached through [`WalletBindingRegistry`];
//! [`InMemoryRegistry`] is the bundled implementation.

pub mod memory;
pub mod types;

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use thiserror::Error;

pub use memory::InMemoryRegistry;
pub use types::{BindingSummary, WalletBinding};

/// Errors raised by a registry backend.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("binding for {0} already exists")]
    AlreadyExists(Address),

    #[error("deposit address {0} is already assigned")]
    DepositAddressTaken(Address),

    #[error("registry IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("registry encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[async_trait]
pub trait WalletBindingRegistry: Send + Sync {
    /// Insert a new binding. Owner and deposit addresses must both be unused.
    async fn create(&self, binding: WalletBinding) -> RegistryResult<()>;

    /// Look up by owner address.
    async fn find_by_user(&self, user: Address) -> RegistryResult<Option<WalletBinding>>;

    /// Look up by custodial deposit address.
    async fn find_by_deposit(&self, deposit: Address) -> RegistryResult<Option<WalletBinding>>;

    /// Store the owner's signed message, moving the binding to bound.
    /// Returns `false` when no binding exists for `user`.
    async fn record_signature(
        &self,
        user: Address,
        message: String,
        signature: Bytes,
    ) -> RegistryResult<bool>;
}
