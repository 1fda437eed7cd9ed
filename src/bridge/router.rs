//! Transfer notification routing.
//!
//! # Data Flow
//! ```text
//! TransferNotification
//!     → registry lookup by deposit address (ignored: wallet not found)
//!     → bound check                         (ignored: not bound)
//!     → origin dispatch                     (ignored: unknown origin)
//!     → txHash claim                        (ignored: duplicate)
//!     → ChainBridgeExecutor::bridge         (handled, on a spawned task)
//! ```

use alloy::primitives::{Address, TxHash};
use dashmap::DashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinError;

use crate::bridge::executor::ChainBridgeExecutor;
use crate::bridge::types::{BridgeError, OriginChain};
use crate::observability::metrics;
use crate::registry::{RegistryError, WalletBindingRegistry};

/// Inbound transfer event from the chain watcher.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferNotification {
    #[serde(default)]
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub value: serde_json::Value,
    pub tx_hash: String,
    /// Token contract; absent for native-currency transfers.
    #[serde(default, alias = "ca")]
    pub contract_address: Option<String>,
    #[serde(alias = "origin")]
    pub origin_chain: String,
}

/// Why a notification was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IgnoreReason {
    #[serde(rename = "wallet not found")]
    WalletNotFound,
    #[serde(rename = "not bound")]
    NotBound,
    #[serde(rename = "unknown origin")]
    UnknownOrigin,
    #[serde(rename = "duplicate")]
    Duplicate,
}

impl IgnoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WalletNotFound => "wallet not found",
            Self::NotBound => "not bound",
            Self::UnknownOrigin => "unknown origin",
            Self::Duplicate => "duplicate",
        }
    }
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// An executor ran; `tx_hash` is `None` when it declined to bridge.
    Handled { tx_hash: Option<TxHash> },
    Ignored { reason: IgnoreReason },
}

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("bridge: {0}")]
    Bridge(#[from] BridgeError),

    /// The bridge task panicked or was cancelled; the claim is kept.
    #[error("bridge task aborted: {0}")]
    Aborted(#[from] JoinError),
}

/// One executor per supported origin chain.
#[derive(Clone)]
pub struct ExecutorSet {
    pub edu_chain: Arc<dyn ChainBridgeExecutor>,
    pub bsc: Arc<dyn ChainBridgeExecutor>,
}

impl ExecutorSet {
    pub fn for_origin(&self, origin: OriginChain) -> &Arc<dyn ChainBridgeExecutor> {
        match origin {
            OriginChain::EduChain => &self.edu_chain,
            OriginChain::Bsc => &self.bsc,
        }
    }
}

/// Origin transaction hashes that have been dispatched.
#[derive(Debug, Default)]
struct ProcessedTransfers {
    seen: DashSet<String>,
}

impl ProcessedTransfers {
    /// Returns `false` if `tx_hash` was already claimed.
    fn claim(&self, tx_hash: &str) -> bool {
        self.seen.insert(tx_hash.to_ascii_lowercase())
    }

    fn release(&self, tx_hash: &str) {
        self.seen.remove(&tx_hash.to_ascii_lowercase());
    }
}

pub struct BridgeRouter {
    registry: Arc<dyn WalletBindingRegistry>,
    executors: ExecutorSet,
    processed: Arc<ProcessedTransfers>,
}

impl BridgeRouter {
    pub fn new(registry: Arc<dyn WalletBindingRegistry>, executors: ExecutorSet) -> Self {
        Self {
            registry,
            executors,
            processed: Arc::default(),
        }
    }

    /// Route one transfer notification to the executor for its origin chain.
    pub async fn handle_transfer(
        &self,
        notification: &TransferNotification,
    ) -> Result<RouteOutcome, RouterError> {
        let outcome = self.route(notification).await;
        match &outcome {
            Ok(RouteOutcome::Handled { .. }) => metrics::record_notification("handled", "none"),
            Ok(RouteOutcome::Ignored { reason }) => {
                metrics::record_notification("ignored", reason.as_str())
            }
            Err(_) => metrics::record_notification("error", "fault"),
        }
        outcome
    }

    async fn route(&self, notification: &TransferNotification) -> Result<RouteOutcome, RouterError> {
        let ignored = |reason: IgnoreReason| -> Result<RouteOutcome, RouterError> {
            tracing::info!(
                tx_hash = %notification.tx_hash,
                to = %notification.to,
                origin = %notification.origin_chain,
                reason = %reason,
                "Transfer ignored"
            );
            Ok(RouteOutcome::Ignored { reason })
        };

        let Ok(deposit) = notification.to.parse::<Address>() else {
            return ignored(IgnoreReason::WalletNotFound);
        };
        let Some(binding) = self.registry.find_by_deposit(deposit).await? else {
            return ignored(IgnoreReason::WalletNotFound);
        };
        if !binding.is_bound() {
            return ignored(IgnoreReason::NotBound);
        }
        let Ok(origin) = notification.origin_chain.parse::<OriginChain>() else {
            return ignored(IgnoreReason::UnknownOrigin);
        };
        if !self.processed.claim(&notification.tx_hash) {
            return ignored(IgnoreReason::Duplicate);
        }

        tracing::info!(
            tx_hash = %notification.tx_hash,
            user = %binding.user_address,
            deposit = %deposit,
            origin = %origin,
            value = %notification.value,
            "Dispatching transfer"
        );

        let executor = Arc::clone(self.executors.for_origin(origin));
        let processed = Arc::clone(&self.processed);
        let encrypted_key = binding.private_key.clone();
        let token = notification.contract_address.clone();
        let origin_tx = notification.tx_hash.clone();

        // Runs detached: dropping the request future must not stop a bridge
        // between its withdrawal and fee transactions.
        let task = tokio::spawn(async move {
            let result = executor.bridge(&encrypted_key, token.as_deref()).await;
            if let Err(e) = &result {
                if !e.submission_attempted() {
                    processed.release(&origin_tx);
                }
            }
            result
        });

        let tx_hash = task.await??;
        Ok(RouteOutcome::Handled { tx_hash })
    }
}
