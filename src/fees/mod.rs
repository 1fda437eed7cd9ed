//! Gas and protocol fee policy.
//!
//! Every executor variant plans through [`FeeEstimator`], so the fee split and
//! the threshold rules live in one place. All amounts are in the smallest
//! currency unit and use checked `U256` arithmetic.

pub mod estimator;

pub use estimator::{BridgePlan, FeeDecision, FeeError, FeeEstimator, SkipReason};
