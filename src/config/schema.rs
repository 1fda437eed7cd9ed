//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge
//! service. All types derive Serde traits for deserialization from config files.
//! Monetary thresholds are expressed in the smallest currency unit (wei).

use alloy::primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};

/// Root configuration for the bridge service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Listener configuration (bind address, limits).
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Custodial key vault settings.
    pub vault: VaultConfig,

    /// Binding registry persistence.
    pub registry: RegistryConfig,

    /// Protocol fee and threshold policy.
    pub fees: FeeConfig,

    /// Per-origin chain settings.
    pub chains: ChainsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds. Bridging waits on several RPC round trips.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 60,
            max_body_size: 64 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output for development.
    #[default]
    Pretty,
    /// One JSON object per line for log aggregation.
    Json,
}

/// Key vault configuration.
///
/// The vault key itself is never part of the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Environment variable holding the hex-encoded 32-byte vault key.
    pub key_env: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            key_env: "FLOWEDU_VAULT_KEY".to_string(),
        }
    }
}

/// Binding registry configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RegistryConfig {
    /// JSON file the in-process registry is loaded from and saved to.
    /// `None` keeps bindings in memory only.
    pub persistence_path: Option<String>,
}

/// Protocol fee and threshold policy, shared by every executor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Address receiving the protocol fee on every origin chain.
    pub fee_collector: Address,

    /// Recipient of bridged funds on the destination chain.
    pub destination_recipient: Address,

    /// Fee rate numerator (default 3, i.e. 0.3%).
    pub fee_numerator: u64,

    /// Fee rate denominator (default 1000).
    pub fee_denominator: u64,

    /// Balances below this floor are never bridged (default 1 native unit).
    pub min_balance_wei: U256,

    /// Net bridge amounts below this threshold are not worth executing.
    pub min_wallet_gas_wei: U256,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            fee_collector: Address::ZERO,
            destination_recipient: Address::ZERO,
            fee_numerator: 3,
            fee_denominator: 1000,
            min_balance_wei: U256::from(1_000_000_000_000_000_000u128),
            min_wallet_gas_wei: U256::from(10_000_000_000_000_000u128),
        }
    }
}

/// Supported origin chains.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ChainsConfig {
    pub edu_chain: EduChainConfig,
    pub bsc: BscConfig,
}

/// RPC connection settings shared by every chain section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID used for EIP-155 signing and endpoint verification.
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Bridging is skipped while the gas price is above this ceiling.
    pub max_gas_price_gwei: u64,
}

impl RpcConfig {
    fn with_endpoint(rpc_url: &str, chain_id: u64) -> Self {
        Self {
            rpc_url: rpc_url.to_string(),
            failover_urls: Vec::new(),
            chain_id,
            rpc_timeout_secs: 10,
            max_gas_price_gwei: 500,
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::with_endpoint("http://localhost:8545", 1)
    }
}

/// EDUChain origin: native withdrawal through the ArbSys precompile.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EduChainConfig {
    #[serde(flatten)]
    pub rpc: RpcConfig,

    /// ArbSys precompile address.
    pub arbsys_address: Address,
}

impl Default for EduChainConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::with_endpoint("https://rpc.edu-chain.raas.gelato.cloud", 41923),
            arbsys_address: address!("0000000000000000000000000000000000000064"),
        }
    }
}

/// BSC origin: native transfer over a LayerZero messaging router.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BscConfig {
    #[serde(flatten)]
    pub rpc: RpcConfig,

    /// Router contract exposing `swapETH`.
    pub router_address: Address,

    /// LayerZero chain ID of the destination (110 = Arbitrum).
    pub destination_lz_chain_id: u16,

    /// Value held back from the transferred amount to pay the messaging fee.
    pub messaging_fee_wei: U256,

    /// Maximum accepted slippage in basis points.
    pub slippage_bps: u16,
}

impl Default for BscConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::with_endpoint("https://bsc-dataseed.bnbchain.org", 56),
            router_address: Address::ZERO,
            destination_lz_chain_id: 110,
            messaging_fee_wei: U256::from(1_000_000_000_000_000u128),
            slippage_bps: 50,
        }
    }
}
