//! Route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::bridge::TransferNotification;
use crate::http::response::{BindSuccess, HealthStatus, ProvisionedWallet, WebhookResponse};
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindRequest {
    pub user_address: String,
    pub message: String,
    pub signature: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRequest {
    pub user_address: String,
}

/// `POST /api/bind-wallet`
pub async fn bind_wallet(State(state): State<AppState>, Json(request): Json<BindRequest>) -> Response {
    match state
        .binding
        .bind(&request.user_address, &request.message, &request.signature)
        .await
    {
        Ok(()) => Json(BindSuccess::ok()).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `POST /api/edu-transfer-webhook`
pub async fn transfer_webhook(
    State(state): State<AppState>,
    Json(notification): Json<TransferNotification>,
) -> WebhookResponse {
    match state.router.handle_transfer(&notification).await {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            tracing::error!(tx_hash = %notification.tx_hash, error = %e, "Transfer handling failed");
            e.into()
        }
    }
}

/// `POST /api/wallets`
pub async fn create_wallet(
    State(state): State<AppState>,
    Json(request): Json<ProvisionRequest>,
) -> Response {
    match state.binding.provision(&request.user_address).await {
        Ok(deposit) => (
            StatusCode::CREATED,
            Json(ProvisionedWallet {
                user_address: request.user_address,
                flow_edu_address: deposit,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /api/wallets/{userAddress}`
pub async fn get_wallet(State(state): State<AppState>, Path(user_address): Path<String>) -> Response {
    match state.binding.lookup(&user_address).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
