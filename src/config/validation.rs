//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. Every problem is collected so
//! an operator sees the full list in one run.

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::{BridgeConfig, RpcConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be the zero address")]
    ZeroAddress { field: &'static str },

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: String, value: String },

    #[error("{field} must be greater than zero")]
    NotPositive { field: String },

    #[error("fee rate {numerator}/{denominator} must be below 100%")]
    FeeRate { numerator: u64, denominator: u64 },

    #[error("slippage of {0} bps exceeds 10000")]
    Slippage(u16),

    #[error("{0} is not a valid socket address")]
    BindAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let fees = &config.fees;
    check_address(&mut errors, "fees.fee_collector", fees.fee_collector);
    check_address(&mut errors, "fees.destination_recipient", fees.destination_recipient);
    if fees.fee_denominator == 0 {
        errors.push(ValidationError::NotPositive {
            field: "fees.fee_denominator".to_string(),
        });
    } else if fees.fee_numerator >= fees.fee_denominator {
        errors.push(ValidationError::FeeRate {
            numerator: fees.fee_numerator,
            denominator: fees.fee_denominator,
        });
    }

    check_rpc(&mut errors, "chains.edu_chain", &config.chains.edu_chain.rpc);
    check_address(
        &mut errors,
        "chains.edu_chain.arbsys_address",
        config.chains.edu_chain.arbsys_address,
    );

    let bsc = &config.chains.bsc;
    check_rpc(&mut errors, "chains.bsc", &bsc.rpc);
    check_address(&mut errors, "chains.bsc.router_address", bsc.router_address);
    if bsc.slippage_bps > 10_000 {
        errors.push(ValidationError::Slippage(bsc.slippage_bps));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: Address) {
    if value.is_zero() {
        errors.push(ValidationError::ZeroAddress { field });
    }
}

fn check_rpc(errors: &mut Vec<ValidationError>, section: &str, rpc: &RpcConfig) {
    let urls = std::iter::once(&rpc.rpc_url).chain(rpc.failover_urls.iter());
    for url in urls {
        if url.parse::<url::Url>().is_err() {
            errors.push(ValidationError::InvalidUrl {
                field: format!("{section}.rpc_url"),
                value: url.clone(),
            });
        }
    }
    if rpc.chain_id == 0 {
        errors.push(ValidationError::NotPositive {
            field: format!("{section}.chain_id"),
        });
    }
    if rpc.rpc_timeout_secs == 0 {
        errors.push(ValidationError::NotPositive {
            field: format!("{section}.rpc_timeout_secs"),
        });
    }
}
