//! Per-identity nonce sequencing
//!
//! Each identity owns one `NonceSequence`, resolved once against the primary
//! endpoint and then advanced locally. The starting value includes pending
//! transactions so an in-flight nonce is never reused. Sequences are private
//! to their identity's preparation task; no cross-identity coordination
//! exists or is needed.

use crate::chain::Endpoint;
use crate::error::{BlastError, BlastResult};

use ethers::types::Address;
use tracing::debug;

/// Owned, task-local nonce counter for one identity
#[derive(Debug)]
pub struct NonceSequence {
    next: u64,
}

impl NonceSequence {
    /// Resolve the starting nonce from the pending-inclusive transaction
    /// count. Failure drops only this identity's batch, never the run.
    pub async fn resolve(primary: &dyn Endpoint, address: Address) -> BlastResult<Self> {
        let start = primary
            .transaction_count(address)
            .await
            .map_err(|e| BlastError::Nonce {
                address,
                message: e.to_string(),
            })?;

        debug!("Starting nonce for {:?}: {}", address, start);
        Ok(Self { next: start })
    }

    /// Start a sequence at a known value
    pub fn start_at(start: u64) -> Self {
        Self { next: start }
    }

    /// Take the next nonce. Consecutive calls yield consecutive integers
    /// with no gaps and no duplicates.
    pub fn next(&mut self) -> u64 {
        let nonce = self.next;
        self.next += 1;
        nonce
    }
}
