//! Blockchain RPC client with timeout and failover handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoints of one origin chain
//! - Query chain state (balances, nonces, gas) and broadcast signed transactions
//! - Handle timeouts and network errors by falling through to the next endpoint
//! - Provide a health check for blockchain connectivity

use alloy::consensus::TxEnvelope;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::config::RpcConfig;
use crate::observability::metrics;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// Chain label used in logs and metrics.
    chain: &'static str,
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: RpcConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// Fails only on an unparseable primary URL. An unreachable endpoint or a
    /// chain ID mismatch is logged and left to the health check.
    pub async fn new(chain: &'static str, config: RpcConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url =
            config
                .rpc_url
                .parse()
                .map_err(|e: url::ParseError| BlockchainError::InvalidUrl {
                    url: config.rpc_url.clone(),
                    reason: e.to_string(),
                })?;
        providers.push(
            Arc::new(ProviderBuilder::new().connect_http(primary_url))
                as Arc<dyn Provider + Send + Sync>,
        );

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(
                    Arc::new(ProviderBuilder::new().connect_http(url))
                        as Arc<dyn Provider + Send + Sync>,
                );
            } else {
                tracing::warn!(chain, url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            chain,
            providers,
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    chain,
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    chain,
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                chain: self.chain,
                expected: self.config.chain_id,
                actual: chain_id,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_chain_id()).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(chain = self.chain, provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(chain = self.chain, provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::ProvidersExhausted {
            chain: self.chain,
            operation: "get chain id",
        })
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_block_number()).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(chain = self.chain, provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(chain = self.chain, provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::ProvidersExhausted {
            chain: self.chain,
            operation: "get block number",
        })
    }

    /// Check if the blockchain is reachable and healthy.
    ///
    /// Returns true if we can query the block number.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.get_block_number().await.is_ok();
        metrics::record_rpc_health(self.chain, healthy);
        healthy
    }

    /// Chain label this client serves.
    pub fn chain(&self) -> &'static str {
        self.chain
    }

    /// Get the configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }
}

#[async_trait]
impl ChainRpc for BlockchainClient {
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_balance(address)).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(chain = self.chain, provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(chain = self.chain, provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::ProvidersExhausted {
            chain: self.chain,
            operation: "get balance",
        })
    }

    async fn get_pending_nonce(&self, address: Address) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_count(address).pending();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(chain = self.chain, provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(chain = self.chain, provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::ProvidersExhausted {
            chain: self.chain,
            operation: "get pending nonce",
        })
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.estimate_gas(tx.clone());
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(chain = self.chain, provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(chain = self.chain, provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::ProvidersExhausted {
            chain: self.chain,
            operation: "estimate gas",
        })
    }

    async fn get_gas_price(&self) -> BlockchainResult<u128> {
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, provider.get_gas_price()).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(chain = self.chain, provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(chain = self.chain, provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::ProvidersExhausted {
            chain: self.chain,
            operation: "get gas price",
        })
    }

    /// Rebroadcasting the same envelope to a failover endpoint is safe: the
    /// hash is fixed by the signature, so at most one copy can be mined.
    async fn send_signed(&self, envelope: TxEnvelope) -> BlockchainResult<TxHash> {
        let mut last_error = String::from("no providers configured");
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.send_tx_envelope(envelope.clone());
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(pending)) => return Ok(*pending.tx_hash()),
                Ok(Err(e)) => {
                    tracing::warn!(chain = self.chain, provider_idx = i, error = %e, "Broadcast failed");
                    last_error = e.to_string();
                }
                Err(_) => {
                    tracing::warn!(chain = self.chain, provider_idx = i, "Broadcast timeout");
                    last_error = format!("timeout after {}s", self.config.rpc_timeout_secs);
                }
            }
        }
        Err(BlockchainError::BroadcastRejected {
            chain: self.chain,
            reason: last_error,
        })
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("chain", &self.chain)
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
