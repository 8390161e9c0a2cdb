//! Fee estimation for competitive inclusion
//!
//! The ceiling deliberately overshoots the current base fee so the batch
//! outbids unknown competing transactions; the cost is a higher spend when
//! included.

use crate::chain::Endpoint;
use crate::error::{BlastError, BlastResult};

use ethers::types::U256;
use tracing::debug;

const WEI_PER_GWEI: u64 = 1_000_000_000;

/// Fee parameters computed once per run and shared read-only by every batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeProfile {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub gas_limit: U256,
    pub chain_id: u64,
}

impl FeeProfile {
    /// Invariant: the ceiling is never below the tip.
    pub fn new(max_fee: U256, tip: U256, gas_limit: U256, chain_id: u64) -> Self {
        Self {
            max_fee_per_gas: std::cmp::max(max_fee, tip),
            max_priority_fee_per_gas: tip,
            gas_limit,
            chain_id,
        }
    }
}

/// Derives a competitive fee ceiling and tip from current network conditions
pub struct FeeEstimator {
    priority_gwei: u64,
    fee_multiplier: u64,
    gas_limit: u64,
}

impl FeeEstimator {
    pub fn new(priority_gwei: u64, fee_multiplier: u64, gas_limit: u64) -> Self {
        Self {
            priority_gwei,
            fee_multiplier,
            gas_limit,
        }
    }

    /// Compute the shared fee profile against the primary endpoint.
    ///
    /// Failure here is fatal for the run; fee computation is a precondition
    /// for every downstream operation.
    pub async fn compute(&self, primary: &dyn Endpoint) -> BlastResult<FeeProfile> {
        let chain_id = primary.chain_id().await.map_err(as_fee_error)?;
        let tip = U256::from(self.priority_gwei) * U256::from(WEI_PER_GWEI);

        let (max_fee, tip) = match primary.base_fee().await.map_err(as_fee_error)? {
            Some(base_fee) => {
                let max_fee = base_fee * U256::from(self.fee_multiplier) + tip;
                debug!(
                    "Base fee {} wei, ceiling {} wei (x{} + {} gwei tip)",
                    base_fee, max_fee, self.fee_multiplier, self.priority_gwei
                );
                (max_fee, tip)
            }
            None => {
                // Header carried no base fee; fall back to the node's own
                // estimate, keeping the configured tip when it is larger.
                let (suggested_max, suggested_tip) =
                    primary.suggest_fees().await.map_err(as_fee_error)?;
                let tip = std::cmp::max(tip, suggested_tip);
                debug!(
                    "No base fee in header, using suggested ceiling {} wei",
                    suggested_max
                );
                (suggested_max, tip)
            }
        };

        Ok(FeeProfile::new(
            max_fee,
            tip,
            U256::from(self.gas_limit),
            chain_id,
        ))
    }
}

fn as_fee_error(e: BlastError) -> BlastError {
    BlastError::Fees(e.to_string())
}
