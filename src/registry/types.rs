//! Binding record types.

use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::vault::EncryptedKey;

/// Association between an owner address and its custodial deposit address.
///
/// A binding without a signature is unbound: funds arriving at its deposit
/// address are never moved on the owner's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBinding {
    /// External owner's address; unique key.
    pub user_address: Address,
    /// Custodial deposit address; immutable once created.
    #[serde(rename = "flowEDUAddress")]
    pub flow_edu_address: Address,
    /// Encrypted key controlling `flow_edu_address`.
    pub private_key: EncryptedKey,
    /// Last message the owner signed.
    pub message: String,
    /// Owner's signature over `message`.
    pub signature: Option<Bytes>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl WalletBinding {
    /// A freshly provisioned, unbound record.
    pub fn unbound(user_address: Address, flow_edu_address: Address, private_key: EncryptedKey) -> Self {
        Self {
            user_address,
            flow_edu_address,
            private_key,
            message: String::new(),
            signature: None,
            timestamp: now_millis(),
        }
    }

    /// Whether the owner has proven control of `user_address`.
    pub fn is_bound(&self) -> bool {
        self.signature.is_some()
    }

    /// Public view without key material.
    pub fn summary(&self) -> BindingSummary {
        BindingSummary {
            user_address: self.user_address,
            flow_edu_address: self.flow_edu_address,
            bound: self.is_bound(),
            timestamp: self.timestamp,
        }
    }
}

/// What callers outside the core may see of a binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingSummary {
    pub user_address: Address,
    #[serde(rename = "flowEDUAddress")]
    pub flow_edu_address: Address,
    pub bound: bool,
    pub timestamp: u64,
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
