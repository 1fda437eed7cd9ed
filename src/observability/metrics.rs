//! Metrics collection and exposition.
//!
//! # Metrics
//! - `flowedu_bind_requests_total` (counter): bind attempts by outcome
//! - `flowedu_transfer_notifications_total` (counter): webhook results by status, reason
//! - `flowedu_bridge_attempts_total` (counter): executor runs by chain, outcome
//! - `flowedu_bridge_fee_wei_total` (counter): collected protocol fee, saturated to u64
//! - `flowedu_rpc_health` (gauge): 1=healthy, 0=unhealthy per chain
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests can call these freely.

use alloy::primitives::U256;
use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_bind(outcome: &'static str) {
    counter!("flowedu_bind_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_notification(status: &'static str, reason: &'static str) {
    counter!(
        "flowedu_transfer_notifications_total",
        "status" => status,
        "reason" => reason
    )
    .increment(1);
}

pub fn record_bridge_attempt(chain: &'static str, outcome: &'static str) {
    counter!("flowedu_bridge_attempts_total", "chain" => chain, "outcome" => outcome).increment(1);
}

pub fn record_fee_collected(chain: &'static str, fee: U256) {
    let fee: u64 = fee.saturating_to();
    counter!("flowedu_bridge_fee_wei_total", "chain" => chain).increment(fee);
}

pub fn record_rpc_health(chain: &'static str, healthy: bool) {
    gauge!("flowedu_rpc_health", "chain" => chain).set(if healthy { 1.0 } else { 0.0 });
}
