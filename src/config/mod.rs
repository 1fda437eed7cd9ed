//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BridgeConfig (validated, immutable)
//!     → sections handed to executors and services at construction
//! ```
//!
//! Secrets (the vault key) never live in the file; the config only names the
//! environment variable that holds them.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BridgeConfig, BscConfig, EduChainConfig, FeeConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, RegistryConfig, RpcConfig, VaultConfig,
};
