//! FlowEDU bridge service.
//!
//! # Architecture Overview
//!
//! ```text
//!   owner ──bind──▶ ┌──────────────┐      ┌──────────────────────┐
//!                   │ http server  │─────▶│ BindingService       │──┐
//!   watcher ──────▶ │              │      └──────────────────────┘  │
//!   (webhook)       └──────┬───────┘                                ▼
//!                          │              ┌──────────────────────┐  ┌──────────┐
//!                          └─────────────▶│ BridgeRouter         │─▶│ registry │
//!                                         └──────────┬───────────┘  └──────────┘
//!                                                    ▼
//!                              ┌──────────────────────────────────────┐
//!                              │ ExecutorSet: EDUChain │ BSC          │
//!                              │   KeyVault → FeeEstimator → ChainRpc │
//!                              └──────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use flowedu_bridge::blockchain::BlockchainClient;
use flowedu_bridge::bridge::{bsc_executor, edu_chain_executor, BridgeRouter, ExecutorSet};
use flowedu_bridge::config::load_config;
use flowedu_bridge::http::{AppState, HttpServer};
use flowedu_bridge::observability::{logging, metrics};
use flowedu_bridge::registry::InMemoryRegistry;
use flowedu_bridge::vault::{AesKeyVault, KeyVault};
use flowedu_bridge::BindingService;

#[derive(Parser)]
#[command(name = "flowedu-bridge")]
#[command(about = "Custodial EDU bridge service", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "flowedu-bridge starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let vault: Arc<dyn KeyVault> = Arc::new(AesKeyVault::from_env(&config.vault.key_env)?);

    let registry = Arc::new(match &config.registry.persistence_path {
        Some(path) => InMemoryRegistry::load_from_file(path)?,
        None => InMemoryRegistry::new(None),
    });

    let edu_client = BlockchainClient::new("edu_chain", config.chains.edu_chain.rpc.clone()).await?;
    let bsc_client = BlockchainClient::new("bsc", config.chains.bsc.rpc.clone()).await?;
    for client in [&edu_client, &bsc_client] {
        if !client.is_healthy().await {
            tracing::warn!(chain = client.chain(), "Chain RPC unreachable at startup");
        }
    }

    let executors = ExecutorSet {
        edu_chain: Arc::new(edu_chain_executor(
            &config.chains.edu_chain,
            &config.fees,
            Arc::new(edu_client),
            vault.clone(),
        )),
        bsc: Arc::new(bsc_executor(
            &config.chains.bsc,
            &config.fees,
            Arc::new(bsc_client),
            vault.clone(),
        )),
    };

    let state = AppState {
        binding: Arc::new(BindingService::new(registry.clone(), vault)),
        router: Arc::new(BridgeRouter::new(registry.clone(), executors)),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    HttpServer::new(&config.listener, state).run(listener).await?;

    registry.save_to_file().await?;
    tracing::info!(bindings = registry.count(), "Shutdown complete");
    Ok(())
}
