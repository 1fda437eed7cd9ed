//! JSON response bodies and error-to-status mapping.

use alloy::primitives::{Address, TxHash};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::binding::BindError;
use crate::bridge::{IgnoreReason, RouteOutcome, RouterError};

#[derive(Debug, Serialize)]
pub struct BindSuccess {
    pub success: bool,
}

impl BindSuccess {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedWallet {
    pub user_address: String,
    #[serde(rename = "flowEDUAddress")]
    pub flow_edu_address: Address,
}

/// Body: `{success:false, kind, message}`.
#[derive(Debug, Serialize)]
struct BindFailureBody {
    success: bool,
    kind: &'static str,
    message: String,
}

impl IntoResponse for BindError {
    fn into_response(self) -> Response {
        let status = match &self {
            BindError::InvalidAddress | BindError::InvalidSignature => StatusCode::BAD_REQUEST,
            BindError::BindingNotFound => StatusCode::NOT_FOUND,
            BindError::AlreadyProvisioned => StatusCode::CONFLICT,
            BindError::Vault(_) | BindError::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = BindFailureBody {
            success: false,
            kind: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Webhook reply, tagged by `status`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WebhookResponse {
    Handled {
        #[serde(rename = "txHash")]
        tx_hash: Option<TxHash>,
    },
    Ignored {
        reason: IgnoreReason,
    },
    Error {
        message: String,
    },
}

impl From<RouteOutcome> for WebhookResponse {
    fn from(outcome: RouteOutcome) -> Self {
        match outcome {
            RouteOutcome::Handled { tx_hash } => Self::Handled { tx_hash },
            RouteOutcome::Ignored { reason } => Self::Ignored { reason },
        }
    }
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::OK,
        };
        (status, Json(self)).into_response()
    }
}

impl From<RouterError> for WebhookResponse {
    fn from(err: RouterError) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_response_shapes() {
        let handled = serde_json::to_value(WebhookResponse::Handled { tx_hash: None }).unwrap();
        assert_eq!(handled, serde_json::json!({"status": "handled", "txHash": null}));

        let ignored = serde_json::to_value(WebhookResponse::Ignored {
            reason: IgnoreReason::NotBound,
        })
        .unwrap();
        assert_eq!(ignored, serde_json::json!({"status": "ignored", "reason": "not bound"}));

        let error = WebhookResponse::Error {
            message: "boom".to_string(),
        };
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bind_error_status() {
        assert_eq!(
            BindError::BindingNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            BindError::InvalidSignature.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            BindError::AlreadyProvisioned.into_response().status(),
            StatusCode::CONFLICT
        );
    }
}
