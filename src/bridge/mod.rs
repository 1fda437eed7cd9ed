//! Bridge subsystem.
//!
//! # Data Flow
//! ```text
//! transfer webhook
//!     → router.rs (binding lookup, origin dispatch, idempotency)
//!     → executor.rs (decrypt, fee plan, withdrawal + fee transactions)
//!         → edu_chain.rs (ArbSys withdrawEth)
//!         → bsc.rs (LayerZero swapETH)
//! ```

pub mod bsc;
pub mod edu_chain;
pub mod executor;
pub mod router;
pub mod types;

pub use bsc::{bsc_executor, BscExecutor, LayerZeroWithdrawal};
pub use edu_chain::{edu_chain_executor, ArbSysWithdrawal, EduChainExecutor};
pub use executor::{ChainBridgeExecutor, ExecutorSettings, NativeBridgeExecutor, WithdrawalRoute};
pub use router::{
    BridgeRouter, ExecutorSet, IgnoreReason, RouteOutcome, RouterError, TransferNotification,
};
pub use types::{BridgeError, BridgeResult, OriginChain, UnknownOrigin};
