//! Shared fixtures for integration tests.
#![allow(dead_code)]

use alloy::consensus::TxEnvelope;
use alloy::primitives::{address, Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tower::ServiceExt;

use flowedu_bridge::blockchain::{BlockchainError, BlockchainResult, ChainRpc};
use flowedu_bridge::bridge::{
    BridgeError, BridgeResult, BridgeRouter, ChainBridgeExecutor, ExecutorSet, OriginChain,
};
use flowedu_bridge::config::{FeeConfig, ListenerConfig};
use flowedu_bridge::http::{build_router, AppState};
use flowedu_bridge::BindingService;
use flowedu_bridge::registry::{InMemoryRegistry, WalletBinding, WalletBindingRegistry};
use flowedu_bridge::vault::{AesKeyVault, EncryptedKey, KeyVault};

pub const ONE_ETHER: u128 = 1_000_000_000_000_000_000;
pub const ONE_GWEI: u128 = 1_000_000_000;

pub const FEE_COLLECTOR: Address = address!("fee0000000000000000000000000000000000fee");
pub const DESTINATION: Address = address!("de50000000000000000000000000000000000de5");

/// Anvil's first account.
pub const DEPOSIT_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEPOSIT_ADDRESS: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

pub fn ether(n: u128) -> U256 {
    U256::from(n * ONE_ETHER)
}

pub fn test_vault() -> Arc<AesKeyVault> {
    Arc::new(AesKeyVault::new([0x42; 32]))
}

pub fn encrypted_deposit_key(vault: &AesKeyVault) -> EncryptedKey {
    let secret = hex::decode(DEPOSIT_KEY).unwrap();
    vault.encrypt(&secret).unwrap()
}

pub fn fee_config() -> FeeConfig {
    FeeConfig {
        fee_collector: FEE_COLLECTOR,
        destination_recipient: DESTINATION,
        ..FeeConfig::default()
    }
}

/// Scripted chain: fixed balance, nonce and gas figures; records broadcasts.
pub struct MockRpc {
    pub balance: Mutex<BlockchainResult<U256>>,
    pub nonce: u64,
    pub withdraw_gas: u64,
    pub transfer_gas: u64,
    pub gas_price: u128,
    /// Zero-based index of the broadcast that fails, if any.
    pub fail_send_at: Option<usize>,
    /// Broadcast index that stalls for the given time before answering.
    pub slow_send_at: Option<(usize, Duration)>,
    pub sent: Mutex<Vec<TxEnvelope>>,
    pub calls: AtomicUsize,
}

impl MockRpc {
    pub fn with_balance(balance: U256) -> Self {
        Self {
            balance: Mutex::new(Ok(balance)),
            nonce: 4,
            withdraw_gas: 100_000,
            transfer_gas: 21_000,
            gas_price: ONE_GWEI,
            fail_send_at: None,
            slow_send_at: None,
            sent: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        let rpc = Self::with_balance(U256::ZERO);
        *rpc.balance.lock().unwrap() = Err(BlockchainError::Rpc("connection refused".to_string()));
        rpc
    }

    pub fn sent(&self) -> Vec<TxEnvelope> {
        self.sent.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn gas_cost(&self) -> U256 {
        U256::from(self.withdraw_gas + self.transfer_gas) * U256::from(self.gas_price)
    }
}

#[async_trait]
impl ChainRpc for MockRpc {
    async fn get_balance(&self, _address: Address) -> BlockchainResult<U256> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.balance.lock().unwrap() {
            Ok(balance) => Ok(*balance),
            Err(e) => Err(BlockchainError::Rpc(e.to_string())),
        }
    }

    async fn get_pending_nonce(&self, _address: Address) -> BlockchainResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.nonce)
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> BlockchainResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let is_plain_transfer = tx.input.input().is_none_or(|input| input.is_empty());
        Ok(if is_plain_transfer {
            self.transfer_gas
        } else {
            self.withdraw_gas
        })
    }

    async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.gas_price)
    }

    async fn send_signed(&self, envelope: TxEnvelope) -> BlockchainResult<TxHash> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((index, delay)) = self.slow_send_at {
            let already_sent = self.sent.lock().unwrap().len();
            if already_sent == index {
                tokio::time::sleep(delay).await;
            }
        }
        let mut sent = self.sent.lock().unwrap();
        if self.fail_send_at == Some(sent.len()) {
            return Err(BlockchainError::Rpc("replacement transaction underpriced".to_string()));
        }
        let hash = *envelope.tx_hash();
        sent.push(envelope);
        Ok(hash)
    }
}

/// What a [`CountingExecutor`] answers.
#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    Hash(TxHash),
    Skip,
    RpcFailure,
    SubmissionFailure,
}

/// Executor stub that counts invocations.
pub struct CountingExecutor {
    chain: OriginChain,
    answer: Scripted,
    calls: AtomicUsize,
    last_token: Mutex<Option<String>>,
}

impl CountingExecutor {
    pub fn new(chain: OriginChain, answer: Scripted) -> Arc<Self> {
        Arc::new(Self {
            chain,
            answer,
            calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainBridgeExecutor for CountingExecutor {
    fn chain(&self) -> OriginChain {
        self.chain
    }

    async fn bridge(
        &self,
        _encrypted_key: &EncryptedKey,
        token_address: Option<&str>,
    ) -> BridgeResult<Option<TxHash>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = token_address.map(str::to_string);
        match self.answer {
            Scripted::Hash(hash) => Ok(Some(hash)),
            Scripted::Skip => Ok(None),
            Scripted::RpcFailure => Err(BridgeError::Rpc(BlockchainError::Timeout(10))),
            Scripted::SubmissionFailure => Err(BridgeError::Submission(BlockchainError::Rpc(
                "nonce too low".to_string(),
            ))),
        }
    }
}

/// Insert a binding for a fresh owner; signed when `bound`.
pub async fn insert_binding(
    registry: &InMemoryRegistry,
    deposit: Address,
    bound: bool,
) -> PrivateKeySigner {
    insert_binding_with_key(registry, deposit, EncryptedKey::new("00"), bound).await
}

pub async fn insert_binding_with_key(
    registry: &InMemoryRegistry,
    deposit: Address,
    private_key: EncryptedKey,
    bound: bool,
) -> PrivateKeySigner {
    let owner = PrivateKeySigner::random();
    registry
        .create(WalletBinding::unbound(owner.address(), deposit, private_key))
        .await
        .unwrap();
    if bound {
        let message = "FlowEDU Wallet Binding";
        let signature = owner.sign_message_sync(message.as_bytes()).unwrap();
        registry
            .record_signature(owner.address(), message.to_string(), signature.as_bytes().to_vec().into())
            .await
            .unwrap();
    }
    owner
}

pub fn sign_hex(signer: &PrivateKeySigner, message: &str) -> String {
    let signature = signer.sign_message_sync(message.as_bytes()).unwrap();
    format!("0x{}", hex::encode(signature.as_bytes()))
}

/// Full HTTP application over an in-memory registry.
pub fn app(registry: Arc<InMemoryRegistry>, executors: ExecutorSet) -> Router {
    app_with_listener(registry, executors, &ListenerConfig::default())
}

pub fn app_with_listener(
    registry: Arc<InMemoryRegistry>,
    executors: ExecutorSet,
    listener: &ListenerConfig,
) -> Router {
    let state = AppState {
        binding: Arc::new(BindingService::new(registry.clone(), test_vault())),
        router: Arc::new(BridgeRouter::new(registry, executors)),
    };
    build_router(listener, state)
}

pub fn counting_executors(answer: Scripted) -> (ExecutorSet, Arc<CountingExecutor>, Arc<CountingExecutor>) {
    let edu = CountingExecutor::new(OriginChain::EduChain, answer);
    let bsc = CountingExecutor::new(OriginChain::Bsc, answer);
    let set = ExecutorSet {
        edu_chain: edu.clone(),
        bsc: bsc.clone(),
    };
    (set, edu, bsc)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}
