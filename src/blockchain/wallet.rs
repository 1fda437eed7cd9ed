//! Scoped signing credentials and signer recovery.
//!
//! # Security
//! - A credential only exists for the duration of one bridge call
//! - It cannot be cloned, serialized or printed; `Debug` shows the address only
//! - The underlying secp256k1 key zeroizes itself on drop

use alloy::consensus::TxEnvelope;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Signature};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use zeroize::Zeroizing;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// A decrypted custodial key, valid for a single operation.
pub struct SigningCredential {
    signer: PrivateKeySigner,
}

impl SigningCredential {
    /// Build a credential from raw 32-byte key material.
    pub fn from_bytes(secret: &[u8]) -> BlockchainResult<Self> {
        let signer = PrivateKeySigner::from_slice(secret)
            .map_err(|e| BlockchainError::Key(format!("Invalid private key: {}", e)))?;
        Ok(Self { signer })
    }

    /// Fresh random key for a new deposit address.
    pub fn generate() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
        }
    }

    /// Raw key material, for handing straight to the vault.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signer.to_bytes().0)
    }

    /// Address controlled by this credential.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a fully populated transaction request.
    ///
    /// The request must already carry nonce, gas limit and gas price; nothing
    /// is filled in from the network here.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxEnvelope> {
        let wallet = EthereumWallet::from(self.signer.clone());
        tx.build(&wallet)
            .await
            .map_err(|e| BlockchainError::Build(e.to_string()))
    }
}

impl std::fmt::Debug for SigningCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredential")
            .field("address", &self.signer.address())
            .finish_non_exhaustive()
    }
}

/// Recover the address that produced an EIP-191 personal-message signature.
pub fn recover_message_signer(message: &str, signature: &[u8]) -> BlockchainResult<Address> {
    let signature = Signature::try_from(signature)
        .map_err(|e| BlockchainError::Key(format!("Malformed signature: {}", e)))?;
    signature
        .recover_address_from_msg(message.as_bytes())
        .map_err(|e| BlockchainError::Key(format!("Signer recovery failed: {}", e)))
}
