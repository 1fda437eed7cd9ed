//! Bridge types and error definitions.

use alloy::primitives::TxHash;
use std::str::FromStr;
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::fees::FeeError;
use crate::vault::VaultError;

/// Supported origin chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginChain {
    EduChain,
    Bsc,
}

impl OriginChain {
    /// Name used on the wire by the transfer watcher.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EduChain => "EDUChain",
            Self::Bsc => "BSC",
        }
    }

    /// Label used in metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EduChain => "edu_chain",
            Self::Bsc => "bsc",
        }
    }
}

impl std::fmt::Display for OriginChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported origin chain: {0}")]
pub struct UnknownOrigin(pub String);

impl FromStr for OriginChain {
    type Err = UnknownOrigin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EDUChain" => Ok(Self::EduChain),
            "BSC" => Ok(Self::Bsc),
            other => Err(UnknownOrigin(other.to_string())),
        }
    }
}

/// Infrastructure faults during a bridge attempt.
///
/// Declining to bridge is not an error; executors return `Ok(None)` for that.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("key vault: {0}")]
    Vault(#[from] VaultError),

    #[error("chain RPC: {0}")]
    Rpc(#[source] BlockchainError),

    #[error("fee computation: {0}")]
    Fee(#[from] FeeError),

    #[error("withdrawal submission failed: {0}")]
    Submission(#[source] BlockchainError),

    /// The withdrawal went out but the fee payment did not. The ledger needs
    /// manual reconciliation.
    #[error("withdrawal {withdrawal_tx} submitted but fee payment failed: {source}")]
    PartialExecution {
        withdrawal_tx: TxHash,
        #[source]
        source: BlockchainError,
    },
}

impl BridgeError {
    /// Whether a transaction may have reached the network before the failure.
    pub fn submission_attempted(&self) -> bool {
        matches!(self, Self::Submission(_) | Self::PartialExecution { .. })
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
