//! Transaction building for custodial submissions.
//!
//! # Responsibilities
//! - Build estimation requests (no nonce, no gas fields)
//! - Pin nonce, gas limit and gas price so the signed transaction costs
//!   exactly what was estimated
//! - Sign with a scoped credential and broadcast through [`ChainRpc`]

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;

use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::types::BlockchainResult;
use crate::blockchain::wallet::SigningCredential;

/// A contract call or plain transfer from a custodial address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSpec {
    pub to: Address,
    pub value: U256,
    pub input: Bytes,
}

impl CallSpec {
    /// A plain native transfer.
    pub fn transfer(to: Address, value: U256) -> Self {
        Self {
            to,
            value,
            input: Bytes::new(),
        }
    }
}

/// Transaction builder bound to one chain.
#[derive(Debug, Clone, Copy)]
pub struct TxBuilder {
    chain_id: u64,
}

impl TxBuilder {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }

    /// Request used for `eth_estimateGas`.
    pub fn estimation_request(&self, from: Address, call: &CallSpec) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(from)
            .with_to(call.to)
            .with_value(call.value)
            .with_input(call.input.clone())
    }

    /// Fully populated legacy request, ready to sign.
    pub fn build(
        &self,
        from: Address,
        call: CallSpec,
        nonce: u64,
        gas_limit: u64,
        gas_price: u128,
    ) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(from)
            .with_to(call.to)
            .with_value(call.value)
            .with_input(call.input)
            .with_nonce(nonce)
            .with_gas_limit(gas_limit)
            .with_gas_price(gas_price)
            .with_chain_id(self.chain_id)
    }

    /// Sign `tx` with `credential` and broadcast it.
    pub async fn submit(
        &self,
        rpc: &dyn ChainRpc,
        credential: &SigningCredential,
        tx: TransactionRequest,
    ) -> BlockchainResult<TxHash> {
        let envelope = credential.sign_transaction(tx).await?;
        let expected = *envelope.tx_hash();
        let hash = rpc.send_signed(envelope).await?;
        if hash != expected {
            tracing::warn!(expected = %expected, returned = %hash, "RPC returned unexpected transaction hash");
        }
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_estimation_request_has_no_gas_fields() {
        let builder = TxBuilder::new(56);
        let call = CallSpec::transfer(address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"), U256::ZERO);
        let req = builder.estimation_request(Address::ZERO, &call);
        assert!(req.nonce.is_none());
        assert!(req.gas.is_none());
        assert!(req.gas_price.is_none());
        assert_eq!(req.from, Some(Address::ZERO));
    }

    #[test]
    fn test_build_pins_gas_and_nonce() {
        let builder = TxBuilder::new(56);
        let call = CallSpec::transfer(Address::ZERO, U256::from(5u64));
        let req = builder.build(Address::ZERO, call, 3, 21_000, 7);
        assert_eq!(req.nonce, Some(3));
        assert_eq!(req.gas, Some(21_000));
        assert_eq!(req.gas_price, Some(7));
        assert_eq!(req.chain_id, Some(56));
        assert_eq!(req.value, Some(U256::from(5u64)));
    }
}
