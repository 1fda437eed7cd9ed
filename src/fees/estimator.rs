//! Bridge amount planning.

use alloy::primitives::U256;
use serde::Serialize;
use thiserror::Error;

use crate::config::FeeConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),

    #[error("fee denominator is zero")]
    ZeroDenominator,
}

pub type FeeResult<T> = Result<T, FeeError>;

/// Why an executor declined to bridge. None of these are faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Token transfers are not bridged; only the native currency is.
    TokenTransfer,
    /// Balance is under the minimum-liquidity floor.
    BelowMinimumBalance,
    /// Gas price is above the configured ceiling.
    GasPriceTooHigh,
    /// Gas alone would consume the balance.
    GasExceedsBalance,
    /// Nothing is left once the fee is taken.
    NonPositiveNet,
    /// Net amount is under the minimum-wallet-gas threshold.
    BelowWalletGasThreshold,
    /// Net amount does not cover the destination messaging fee.
    BelowMessagingFee,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TokenTransfer => "token_transfer",
            Self::BelowMinimumBalance => "below_minimum_balance",
            Self::GasPriceTooHigh => "gas_price_too_high",
            Self::GasExceedsBalance => "gas_exceeds_balance",
            Self::NonPositiveNet => "non_positive_net",
            Self::BelowWalletGasThreshold => "below_wallet_gas_threshold",
            Self::BelowMessagingFee => "below_messaging_fee",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Amounts for one bridge execution.
///
/// `balance = gas_cost + bridge_amount` and `bridge_amount = net_amount + fee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgePlan {
    pub gas_cost: U256,
    pub bridge_amount: U256,
    pub fee: U256,
    pub net_amount: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeDecision {
    Proceed(BridgePlan),
    Skip(SkipReason),
}

/// Converts gas estimates into costs and applies the protocol fee policy.
#[derive(Debug, Clone)]
pub struct FeeEstimator {
    numerator: U256,
    denominator: U256,
    min_balance: U256,
    min_wallet_gas: U256,
}

impl FeeEstimator {
    pub fn new(numerator: u64, denominator: u64, min_balance: U256, min_wallet_gas: U256) -> Self {
        Self {
            numerator: U256::from(numerator),
            denominator: U256::from(denominator),
            min_balance,
            min_wallet_gas,
        }
    }

    pub fn from_config(config: &FeeConfig) -> Self {
        Self::new(
            config.fee_numerator,
            config.fee_denominator,
            config.min_balance_wei,
            config.min_wallet_gas_wei,
        )
    }

    /// `gas_units * gas_price`.
    pub fn gas_cost(gas_units: u64, gas_price: u128) -> FeeResult<U256> {
        U256::from(gas_units)
            .checked_mul(U256::from(gas_price))
            .ok_or(FeeError::Overflow("gas cost"))
    }

    /// Protocol fee owed on `amount`, truncated toward zero.
    pub fn fee(&self, amount: U256) -> FeeResult<U256> {
        let scaled = amount
            .checked_mul(self.numerator)
            .ok_or(FeeError::Overflow("fee"))?;
        scaled
            .checked_div(self.denominator)
            .ok_or(FeeError::ZeroDenominator)
    }

    /// Whether `balance` clears the minimum-liquidity floor.
    pub fn meets_minimum_balance(&self, balance: U256) -> bool {
        balance >= self.min_balance
    }

    /// Decide whether `balance` can be bridged after paying `gas_units` at
    /// `gas_price`, and how it splits.
    pub fn plan(&self, balance: U256, gas_units: u64, gas_price: u128) -> FeeResult<FeeDecision> {
        let gas_cost = Self::gas_cost(gas_units, gas_price)?;

        let Some(bridge_amount) = balance.checked_sub(gas_cost).filter(|a| !a.is_zero()) else {
            return Ok(FeeDecision::Skip(SkipReason::GasExceedsBalance));
        };

        let fee = self.fee(bridge_amount)?;
        let Some(net_amount) = bridge_amount.checked_sub(fee).filter(|a| !a.is_zero()) else {
            return Ok(FeeDecision::Skip(SkipReason::NonPositiveNet));
        };

        if net_amount < self.min_wallet_gas {
            return Ok(FeeDecision::Skip(SkipReason::BelowWalletGasThreshold));
        }

        Ok(FeeDecision::Proceed(BridgePlan {
            gas_cost,
            bridge_amount,
            fee,
            net_amount,
        }))
    }
}
