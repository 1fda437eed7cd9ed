//! RPC and signing errors shared by the chain clients and executors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("invalid RPC URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A single RPC call failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Every configured endpoint of `chain` failed `operation`.
    #[error("{chain}: all RPC providers failed to {operation}")]
    ProvidersExhausted {
        chain: &'static str,
        operation: &'static str,
    },

    /// No endpoint accepted a signed transaction; `reason` is the last rejection.
    #[error("{chain}: broadcast rejected by every provider: {reason}")]
    BroadcastRejected { chain: &'static str, reason: String },

    /// Unusable key material or signature.
    #[error("signing key: {0}")]
    Key(String),

    #[error("transaction build error: {0}")]
    Build(String),

    #[error("{chain}: chain ID mismatch, expected {expected}, got {actual}")]
    ChainMismatch {
        chain: &'static str,
        expected: u64,
        actual: u64,
    },
}

pub type BlockchainResult<T> = Result<T, BlockchainError>;
