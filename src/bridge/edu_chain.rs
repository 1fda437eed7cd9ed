//! EDUChain origin: native withdrawal to the parent chain through ArbSys.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use std::sync::Arc;

use crate::blockchain::{CallSpec, ChainRpc};
use crate::bridge::executor::{ExecutorSettings, NativeBridgeExecutor, WithdrawalRoute};
use crate::bridge::types::OriginChain;
use crate::config::{EduChainConfig, FeeConfig};
use crate::vault::KeyVault;

sol! {
    /// Arbitrum system precompile, present on every Orbit chain.
    interface IArbSys {
        function withdrawEth(address destination) external payable returns (uint256);
    }
}

/// `ArbSys.withdrawEth(destination)` carrying the amount as call value.
#[derive(Debug, Clone)]
pub struct ArbSysWithdrawal {
    arbsys: Address,
    destination: Address,
}

impl ArbSysWithdrawal {
    pub fn new(arbsys: Address, destination: Address) -> Self {
        Self { arbsys, destination }
    }
}

impl WithdrawalRoute for ArbSysWithdrawal {
    fn mechanism(&self) -> &'static str {
        "arbsys_withdraw_eth"
    }

    fn withdrawal_call(&self, _from: Address, amount: U256) -> CallSpec {
        let input = IArbSys::withdrawEthCall {
            destination: self.destination,
        }
        .abi_encode();
        CallSpec {
            to: self.arbsys,
            value: amount,
            input: input.into(),
        }
    }
}

pub type EduChainExecutor = NativeBridgeExecutor<ArbSysWithdrawal>;

/// Build the EDUChain executor from configuration.
pub fn edu_chain_executor(
    config: &EduChainConfig,
    fees: &FeeConfig,
    rpc: Arc<dyn ChainRpc>,
    vault: Arc<dyn KeyVault>,
) -> EduChainExecutor {
    NativeBridgeExecutor::new(
        OriginChain::EduChain,
        ExecutorSettings::new(&config.rpc, fees),
        rpc,
        vault,
        ArbSysWithdrawal::new(config.arbsys_address, fees.destination_recipient),
    )
}
