//! BSC origin: native transfer over a LayerZero messaging router.
//!
//! The router is called with the full net amount as value. A configured
//! reserve of that value pays the messaging fee, so only the remainder is
//! credited on the destination chain.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use std::sync::Arc;

use crate::blockchain::{CallSpec, ChainRpc};
use crate::bridge::executor::{ExecutorSettings, NativeBridgeExecutor, WithdrawalRoute};
use crate::bridge::types::OriginChain;
use crate::config::{BscConfig, FeeConfig};
use crate::vault::KeyVault;

const BPS_DENOMINATOR: u64 = 10_000;

sol! {
    interface IStargateRouterETH {
        function swapETH(
            uint16 dstChainId,
            address refundAddress,
            bytes toAddress,
            uint256 amountLD,
            uint256 minAmountLD
        ) external payable;
    }
}

/// `swapETH` on a Stargate-style ETH router.
#[derive(Debug, Clone)]
pub struct LayerZeroWithdrawal {
    router: Address,
    destination: Address,
    destination_chain_id: u16,
    messaging_fee: U256,
    slippage_bps: u16,
}

impl LayerZeroWithdrawal {
    pub fn new(
        router: Address,
        destination: Address,
        destination_chain_id: u16,
        messaging_fee: U256,
        slippage_bps: u16,
    ) -> Self {
        Self {
            router,
            destination,
            destination_chain_id,
            messaging_fee,
            slippage_bps,
        }
    }

    fn min_received(&self, amount: U256) -> U256 {
        let keep = BPS_DENOMINATOR.saturating_sub(u64::from(self.slippage_bps));
        amount.saturating_mul(U256::from(keep)) / U256::from(BPS_DENOMINATOR)
    }
}

impl WithdrawalRoute for LayerZeroWithdrawal {
    fn mechanism(&self) -> &'static str {
        "layerzero_swap_eth"
    }

    fn withdrawal_call(&self, from: Address, amount: U256) -> CallSpec {
        let amount_ld = amount.saturating_sub(self.messaging_fee);
        let input = IStargateRouterETH::swapETHCall {
            dstChainId: self.destination_chain_id,
            refundAddress: from,
            toAddress: Bytes::copy_from_slice(self.destination.as_slice()),
            amountLD: amount_ld,
            minAmountLD: self.min_received(amount_ld),
        }
        .abi_encode();
        CallSpec {
            to: self.router,
            value: amount,
            input: input.into(),
        }
    }

    fn minimum_amount(&self) -> U256 {
        self.messaging_fee
    }
}

pub type BscExecutor = NativeBridgeExecutor<LayerZeroWithdrawal>;

/// Build the BSC executor from configuration.
pub fn bsc_executor(
    config: &BscConfig,
    fees: &FeeConfig,
    rpc: Arc<dyn ChainRpc>,
    vault: Arc<dyn KeyVault>,
) -> BscExecutor {
    NativeBridgeExecutor::new(
        OriginChain::Bsc,
        ExecutorSettings::new(&config.rpc, fees),
        rpc,
        vault,
        LayerZeroWithdrawal::new(
            config.router_address,
            fees.destination_recipient,
            config.destination_lz_chain_id,
            config.messaging_fee_wei,
            config.slippage_bps,
        ),
    )
}
