//! FlowEDU custodial cross-chain bridge library.

pub mod binding;
pub mod blockchain;
pub mod bridge;
pub mod config;
pub mod fees;
pub mod http;
pub mod observability;
pub mod registry;
pub mod vault;

pub use binding::BindingService;
pub use bridge::{BridgeRouter, ExecutorSet};
pub use config::BridgeConfig;
pub use http::HttpServer;
