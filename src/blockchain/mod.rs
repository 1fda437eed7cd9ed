//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! KeyVault (decrypted custodial key)
//!     → wallet.rs (scoped credential, local signing)
//!     → transaction.rs (build, sign, broadcast)
//!     → rpc.rs (ChainRpc seam)
//!     → client.rs (RPC connection with timeouts and failover)
//! ```
//!
//! # Security Constraints
//! - Custodial keys only exist decrypted inside one executor call
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod rpc;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use rpc::ChainRpc;
pub use transaction::{CallSpec, TxBuilder};
pub use types::{BlockchainError, BlockchainResult};
pub use wallet::{recover_message_signer, SigningCredential};
