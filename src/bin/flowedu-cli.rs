use alloy::primitives::U256;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::BufRead;
use std::path::PathBuf;
use zeroize::Zeroizing;

use flowedu_bridge::blockchain::SigningCredential;
use flowedu_bridge::config::{load_config, FeeConfig};
use flowedu_bridge::fees::{FeeDecision, FeeEstimator};
use flowedu_bridge::vault::{AesKeyVault, KeyVault};

#[derive(Parser)]
#[command(name = "flowedu-cli")]
#[command(about = "Operator CLI for the FlowEDU bridge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a hex private key read from stdin for storage in a binding
    EncryptKey {
        /// Environment variable holding the vault key
        #[arg(long, default_value = "FLOWEDU_VAULT_KEY")]
        key_env: String,
    },
    /// Protocol fee owed on an amount (wei)
    Fee {
        amount: U256,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Dry-run the bridge amount split for a balance
    Plan {
        /// Deposit balance in wei
        #[arg(long)]
        balance: U256,
        /// Combined gas units of the withdrawal and fee transactions
        #[arg(long)]
        gas_units: u64,
        /// Gas price in wei
        #[arg(long)]
        gas_price: u128,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Query a running service's health endpoint
    Health {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::EncryptKey { key_env } => {
            let vault = AesKeyVault::from_env(&key_env)?;
            let mut line = Zeroizing::new(String::new());
            std::io::stdin().lock().read_line(&mut line)?;
            let raw = line.trim();
            let secret = Zeroizing::new(hex::decode(raw.strip_prefix("0x").unwrap_or(raw))?);

            let credential = SigningCredential::from_bytes(&secret)?;
            let encrypted = vault.encrypt(&secret)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "flowEDUAddress": credential.address(),
                    "privateKey": encrypted,
                }))?
            );
        }
        Commands::Fee { amount, config } => {
            let estimator = FeeEstimator::from_config(&fee_config(config)?);
            println!("{}", estimator.fee(amount)?);
        }
        Commands::Plan {
            balance,
            gas_units,
            gas_price,
            config,
        } => {
            let estimator = FeeEstimator::from_config(&fee_config(config)?);
            if !estimator.meets_minimum_balance(balance) {
                println!("skip: below_minimum_balance");
                return Ok(());
            }
            match estimator.plan(balance, gas_units, gas_price)? {
                FeeDecision::Proceed(plan) => {
                    println!("gas_cost:      {}", plan.gas_cost);
                    println!("bridge_amount: {}", plan.bridge_amount);
                    println!("fee:           {}", plan.fee);
                    println!("net_amount:    {}", plan.net_amount);
                }
                FeeDecision::Skip(reason) => println!("skip: {}", reason),
            }
        }
        Commands::Health { url } => {
            let res = reqwest::get(format!("{}/health", url.trim_end_matches('/'))).await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: service returned status {}", status);
                if let Ok(text) = res.text().await {
                    eprintln!("Response: {}", text);
                }
                return Ok(());
            }
            let json: Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

fn fee_config(path: Option<PathBuf>) -> Result<FeeConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => load_config(&path)?.fees,
        None => FeeConfig::default(),
    })
}
