mod common;

use alloy::consensus::Transaction;
use alloy::primitives::{address, b256, Address};
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use common::*;
use flowedu_bridge::bridge::{
    edu_chain_executor, BridgeRouter, ExecutorSet, IgnoreReason, RouteOutcome, RouterError,
    TransferNotification,
};
use flowedu_bridge::config::{EduChainConfig, ListenerConfig};
use flowedu_bridge::registry::InMemoryRegistry;

const FLOW_EDU: Address = address!("f10e000000000000000000000000000000000ed0");
const MOCK_HASH: alloy::primitives::TxHash =
    b256!("1111111111111111111111111111111111111111111111111111111111111111");

fn notification(to: &str, origin: &str, tx_hash: &str) -> serde_json::Value {
    json!({
        "from": "0x000000000000000000000000000000000000f00d",
        "to": to,
        "value": "100",
        "txHash": tx_hash,
        "ca": "0xToken",
        "origin": origin,
    })
}

async fn bound_registry() -> Arc<InMemoryRegistry> {
    let registry = Arc::new(InMemoryRegistry::new(None));
    insert_binding(&registry, FLOW_EDU, true).await;
    registry
}

#[tokio::test]
async fn bsc_transfer_is_handled() {
    let (executors, edu, bsc) = counting_executors(Scripted::Hash(MOCK_HASH));
    let app = app(bound_registry().await, executors);

    let (status, body) = post_json(
        &app,
        "/api/edu-transfer-webhook",
        notification(&FLOW_EDU.to_string(), "BSC", "0xTx1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "handled");
    assert_eq!(body["txHash"], MOCK_HASH.to_string());
    assert_eq!(bsc.calls(), 1);
    assert_eq!(edu.calls(), 0);
    assert_eq!(bsc.last_token().as_deref(), Some("0xToken"));
}

#[tokio::test]
async fn edu_chain_transfer_is_handled() {
    let (executors, edu, bsc) = counting_executors(Scripted::Hash(MOCK_HASH));
    let app = app(bound_registry().await, executors);

    let (status, body) = post_json(
        &app,
        "/api/edu-transfer-webhook",
        notification(&FLOW_EDU.to_string(), "EDUChain", "0xTx2"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "handled");
    assert_eq!(edu.calls(), 1);
    assert_eq!(bsc.calls(), 0);
}

#[tokio::test]
async fn declined_bridge_is_still_handled() {
    let (executors, _, bsc) = counting_executors(Scripted::Skip);
    let app = app(bound_registry().await, executors);

    let (status, body) = post_json(
        &app,
        "/api/edu-transfer-webhook",
        json!({
            "to": FLOW_EDU.to_string(),
            "value": 1,
            "txHash": "0xTx3",
            "originChain": "BSC",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "handled", "txHash": null}));
    assert_eq!(bsc.last_token(), None);
}

#[tokio::test]
async fn unknown_wallet_is_ignored() {
    let (executors, edu, bsc) = counting_executors(Scripted::Hash(MOCK_HASH));
    let app = app(bound_registry().await, executors);

    for to in ["0xUnboundAddress", "0x00000000000000000000000000000000000000aa"] {
        let (status, body) =
            post_json(&app, "/api/edu-transfer-webhook", notification(to, "BSC", "0xTx4")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ignored", "reason": "wallet not found"}));
    }
    assert_eq!(edu.calls() + bsc.calls(), 0);
}

#[tokio::test]
async fn unbound_wallet_is_ignored() {
    let registry = Arc::new(InMemoryRegistry::new(None));
    insert_binding(&registry, FLOW_EDU, false).await;
    let (executors, edu, bsc) = counting_executors(Scripted::Hash(MOCK_HASH));
    let app = app(registry, executors);

    let (_, body) = post_json(
        &app,
        "/api/edu-transfer-webhook",
        notification(&FLOW_EDU.to_string(), "BSC", "0xTx5"),
    )
    .await;

    assert_eq!(body, json!({"status": "ignored", "reason": "not bound"}));
    assert_eq!(edu.calls() + bsc.calls(), 0);
}

#[tokio::test]
async fn unknown_origin_is_ignored() {
    let (executors, edu, bsc) = counting_executors(Scripted::Hash(MOCK_HASH));
    let app = app(bound_registry().await, executors);

    let (_, body) = post_json(
        &app,
        "/api/edu-transfer-webhook",
        notification(&FLOW_EDU.to_string(), "UnknownChain", "0xTx6"),
    )
    .await;

    assert_eq!(body, json!({"status": "ignored", "reason": "unknown origin"}));
    assert_eq!(edu.calls() + bsc.calls(), 0);
}

#[tokio::test]
async fn duplicate_tx_hash_runs_executor_once() {
    let (executors, _, bsc) = counting_executors(Scripted::Hash(MOCK_HASH));
    let app = app(bound_registry().await, executors);
    let body = notification(&FLOW_EDU.to_string(), "BSC", "0xDup");

    let (_, first) = post_json(&app, "/api/edu-transfer-webhook", body.clone()).await;
    let (_, second) = post_json(&app, "/api/edu-transfer-webhook", body).await;

    assert_eq!(first["status"], "handled");
    assert_eq!(second, json!({"status": "ignored", "reason": "duplicate"}));
    assert_eq!(bsc.calls(), 1);
}

#[tokio::test]
async fn executor_fault_is_a_server_error() {
    let (executors, _, _) = counting_executors(Scripted::SubmissionFailure);
    let app = app(bound_registry().await, executors);

    let (status, body) = post_json(
        &app,
        "/api/edu-transfer-webhook",
        notification(&FLOW_EDU.to_string(), "EDUChain", "0xTx7"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("nonce too low"));
}

#[tokio::test]
async fn pre_submission_failure_can_be_redelivered() {
    let (executors, _, bsc) = counting_executors(Scripted::RpcFailure);
    let router = BridgeRouter::new(bound_registry().await, executors);
    let n: TransferNotification =
        serde_json::from_value(notification(&FLOW_EDU.to_string(), "BSC", "0xRetry")).unwrap();

    assert!(matches!(router.handle_transfer(&n).await, Err(RouterError::Bridge(_))));
    assert!(matches!(router.handle_transfer(&n).await, Err(RouterError::Bridge(_))));
    assert_eq!(bsc.calls(), 2);
}

#[tokio::test]
async fn submitted_failure_is_not_redelivered() {
    let (executors, _, bsc) = counting_executors(Scripted::SubmissionFailure);
    let router = BridgeRouter::new(bound_registry().await, executors);
    let n: TransferNotification =
        serde_json::from_value(notification(&FLOW_EDU.to_string(), "BSC", "0xOnce")).unwrap();

    assert!(router.handle_transfer(&n).await.is_err());
    assert_eq!(
        router.handle_transfer(&n).await.unwrap(),
        RouteOutcome::Ignored {
            reason: IgnoreReason::Duplicate
        }
    );
    assert_eq!(bsc.calls(), 1);
}

#[tokio::test]
async fn request_timeout_does_not_cut_a_bridge_short() {
    let vault = test_vault();
    let registry = Arc::new(InMemoryRegistry::new(None));
    insert_binding_with_key(&registry, DEPOSIT_ADDRESS, encrypted_deposit_key(&vault), true).await;

    // The fee transfer stalls past the request deadline
    let mut mock = MockRpc::with_balance(ether(10));
    mock.slow_send_at = Some((1, Duration::from_secs(2)));
    let rpc = Arc::new(mock);
    let edu = edu_chain_executor(&EduChainConfig::default(), &fee_config(), rpc.clone(), vault);
    let (counting, _, _) = counting_executors(Scripted::Skip);
    let executors = ExecutorSet {
        edu_chain: Arc::new(edu),
        ..counting
    };
    let listener = ListenerConfig {
        request_timeout_secs: 1,
        ..ListenerConfig::default()
    };
    let app = app_with_listener(registry, executors, &listener);
    let body = notification(&DEPOSIT_ADDRESS.to_string(), "EDUChain", "0xSlow");

    let (status, _) = post_json(&app, "/api/edu-transfer-webhook", body.clone()).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

    tokio::time::sleep(Duration::from_secs(3)).await;
    let sent = rpc.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].to(), Some(FEE_COLLECTOR));

    let (_, redelivery) = post_json(&app, "/api/edu-transfer-webhook", body).await;
    assert_eq!(redelivery, json!({"status": "ignored", "reason": "duplicate"}));
}
