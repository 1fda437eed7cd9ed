//! Native-currency bridge executor.
//!
//! # Sequence
//! ```text
//! token check → decrypt key → balance floor → gas estimates + price
//!     → FeeEstimator::plan → withdrawal tx (nonce n) → fee tx (nonce n+1, skipped at zero fee)
//! ```
//! Each step gates the next; nothing is reordered or skipped. The decrypted
//! credential lives on this call's stack only.

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::{CallSpec, ChainRpc, TxBuilder};
use crate::bridge::types::{BridgeError, BridgeResult, OriginChain};
use crate::config::{FeeConfig, RpcConfig};
use crate::fees::{FeeDecision, FeeError, FeeEstimator, SkipReason};
use crate::observability::metrics;
use crate::vault::{EncryptedKey, KeyVault};

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Moves the balance of a custodial deposit address to the destination chain.
#[async_trait]
pub trait ChainBridgeExecutor: Send + Sync {
    /// Origin chain this executor serves.
    fn chain(&self) -> OriginChain;

    /// Bridge the native balance controlled by `encrypted_key`.
    ///
    /// Returns the withdrawal hash, or `None` when bridging was declined.
    async fn bridge(
        &self,
        encrypted_key: &EncryptedKey,
        token_address: Option<&str>,
    ) -> BridgeResult<Option<TxHash>>;
}

/// Chain-specific withdrawal mechanism.
pub trait WithdrawalRoute: Send + Sync {
    /// Mechanism name for logs.
    fn mechanism(&self) -> &'static str;

    /// Call that moves `amount` from `from` toward the destination chain.
    fn withdrawal_call(&self, from: Address, amount: U256) -> CallSpec;

    /// Net amounts at or below this cannot be carried by the mechanism.
    fn minimum_amount(&self) -> U256 {
        U256::ZERO
    }
}

/// Per-chain settings fixed at construction.
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    pub chain_id: u64,
    pub max_gas_price_wei: u128,
    pub fee_collector: Address,
    pub fees: FeeEstimator,
}

impl ExecutorSettings {
    pub fn new(rpc: &RpcConfig, fees: &FeeConfig) -> Self {
        Self {
            chain_id: rpc.chain_id,
            max_gas_price_wei: u128::from(rpc.max_gas_price_gwei) * WEI_PER_GWEI,
            fee_collector: fees.fee_collector,
            fees: FeeEstimator::from_config(fees),
        }
    }
}

/// Executor shared by every origin chain; `R` supplies the withdrawal call.
pub struct NativeBridgeExecutor<R> {
    chain: OriginChain,
    settings: ExecutorSettings,
    rpc: Arc<dyn ChainRpc>,
    vault: Arc<dyn KeyVault>,
    route: R,
    tx_builder: TxBuilder,
}

impl<R: WithdrawalRoute> NativeBridgeExecutor<R> {
    pub fn new(
        chain: OriginChain,
        settings: ExecutorSettings,
        rpc: Arc<dyn ChainRpc>,
        vault: Arc<dyn KeyVault>,
        route: R,
    ) -> Self {
        let tx_builder = TxBuilder::new(settings.chain_id);
        Self {
            chain,
            settings,
            rpc,
            vault,
            route,
            tx_builder,
        }
    }

    fn skip(&self, reason: SkipReason, deposit: Option<Address>) -> BridgeResult<Option<TxHash>> {
        tracing::info!(
            chain = %self.chain,
            deposit = ?deposit,
            reason = %reason,
            "Bridge skipped"
        );
        metrics::record_bridge_attempt(self.chain.label(), reason.as_str());
        Ok(None)
    }

    async fn execute(
        &self,
        encrypted_key: &EncryptedKey,
        token_address: Option<&str>,
    ) -> BridgeResult<Option<TxHash>> {
        if let Some(token) = token_address {
            tracing::debug!(chain = %self.chain, token, "Token transfer, not bridged");
            return self.skip(SkipReason::TokenTransfer, None);
        }

        let credential = self.vault.decrypt(encrypted_key)?;
        let from = credential.address();
        let rpc = self.rpc.as_ref();

        let balance = rpc.get_balance(from).await.map_err(BridgeError::Rpc)?;
        if !self.settings.fees.meets_minimum_balance(balance) {
            return self.skip(SkipReason::BelowMinimumBalance, Some(from));
        }

        let withdrawal_probe = self.route.withdrawal_call(from, balance);
        let fee_probe = CallSpec::transfer(self.settings.fee_collector, U256::ZERO);
        let gas_withdraw = rpc
            .estimate_gas(&self.tx_builder.estimation_request(from, &withdrawal_probe))
            .await
            .map_err(BridgeError::Rpc)?;
        let gas_fee = rpc
            .estimate_gas(&self.tx_builder.estimation_request(from, &fee_probe))
            .await
            .map_err(BridgeError::Rpc)?;
        let gas_price = rpc.get_gas_price().await.map_err(BridgeError::Rpc)?;

        if gas_price > self.settings.max_gas_price_wei {
            return self.skip(SkipReason::GasPriceTooHigh, Some(from));
        }

        let gas_units = gas_withdraw
            .checked_add(gas_fee)
            .ok_or(FeeError::Overflow("gas units"))?;
        let plan = match self.settings.fees.plan(balance, gas_units, gas_price)? {
            FeeDecision::Proceed(plan) => plan,
            FeeDecision::Skip(reason) => return self.skip(reason, Some(from)),
        };
        // A zero fee sends no transfer, so its gas is not reserved.
        let plan = if plan.fee.is_zero() {
            match self.settings.fees.plan(balance, gas_withdraw, gas_price)? {
                FeeDecision::Proceed(withdrawal_only) if withdrawal_only.fee.is_zero() => withdrawal_only,
                _ => plan,
            }
        } else {
            plan
        };
        if plan.net_amount <= self.route.minimum_amount() {
            return self.skip(SkipReason::BelowMessagingFee, Some(from));
        }

        tracing::info!(
            chain = %self.chain,
            deposit = %from,
            mechanism = self.route.mechanism(),
            balance = %balance,
            gas_cost = %plan.gas_cost,
            net_amount = %plan.net_amount,
            fee = %plan.fee,
            "Bridging deposit"
        );

        let nonce = rpc.get_pending_nonce(from).await.map_err(BridgeError::Rpc)?;

        let withdrawal = self.tx_builder.build(
            from,
            self.route.withdrawal_call(from, plan.net_amount),
            nonce,
            gas_withdraw,
            gas_price,
        );
        let withdrawal_tx = self
            .tx_builder
            .submit(rpc, &credential, withdrawal)
            .await
            .map_err(BridgeError::Submission)?;

        let fee_tx = if plan.fee.is_zero() {
            None
        } else {
            let fee_payment = self.tx_builder.build(
                from,
                CallSpec::transfer(self.settings.fee_collector, plan.fee),
                nonce + 1,
                gas_fee,
                gas_price,
            );
            let fee_tx = self
                .tx_builder
                .submit(rpc, &credential, fee_payment)
                .await
                .map_err(|source| BridgeError::PartialExecution {
                    withdrawal_tx,
                    source,
                })?;
            Some(fee_tx)
        };
        drop(credential);

        tracing::info!(
            chain = %self.chain,
            deposit = %from,
            withdrawal_tx = %withdrawal_tx,
            fee_tx = ?fee_tx,
            "Bridge submitted"
        );
        metrics::record_bridge_attempt(self.chain.label(), "submitted");
        metrics::record_fee_collected(self.chain.label(), plan.fee);

        Ok(Some(withdrawal_tx))
    }
}

#[async_trait]
impl<R: WithdrawalRoute> ChainBridgeExecutor for NativeBridgeExecutor<R> {
    fn chain(&self) -> OriginChain {
        self.chain
    }

    async fn bridge(
        &self,
        encrypted_key: &EncryptedKey,
        token_address: Option<&str>,
    ) -> BridgeResult<Option<TxHash>> {
        let result = self.execute(encrypted_key, token_address).await;
        if let Err(e) = &result {
            tracing::error!(chain = %self.chain, error = %e, "Bridge failed");
            metrics::record_bridge_attempt(self.chain.label(), "failed");
        }
        result
    }
}
