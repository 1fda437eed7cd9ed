//! The narrow chain-RPC surface the bridge core depends on.
//!
//! Executors only talk to a chain through this trait, so tests can swap in a
//! scripted implementation and production uses [`BlockchainClient`].
//!
//! [`BlockchainClient`]: crate::blockchain::BlockchainClient

use alloy::consensus::TxEnvelope;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::blockchain::types::BlockchainResult;

#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Native balance of `address` at the latest block.
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256>;

    /// Next usable nonce for `address`, counting pending transactions.
    async fn get_pending_nonce(&self, address: Address) -> BlockchainResult<u64>;

    /// Gas units `tx` would consume.
    async fn estimate_gas(&self, tx: &TransactionRequest) -> BlockchainResult<u64>;

    /// Current gas price in wei.
    async fn get_gas_price(&self) -> BlockchainResult<u128>;

    /// Broadcast an already signed transaction.
    async fn send_signed(&self, envelope: TxEnvelope) -> BlockchainResult<TxHash>;
}
