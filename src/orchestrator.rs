//! Batch orchestration: fees once, identity-parallel preparation, then a
//! concurrent race per flattened transaction
//!
//! Partial failure is first-class: a failed identity drops only its own
//! batch, and a lost race records a failure outcome without touching any
//! sibling transaction.

use crate::chain::EndpointPool;
use crate::config::Settings;
use crate::error::{BlastError, BlastResult};
use crate::identity::Identity;
use crate::tx::{build_signed, BroadcastOutcome, BroadcastRacer, FeeEstimator, FeeProfile,
    NonceSequence, SignedTransaction};

use futures::future::join_all;
use tracing::{debug, info, warn};

/// Coordinates one full broadcast run
pub struct Orchestrator {
    settings: Settings,
}

impl Orchestrator {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Run the batch end to end, returning one outcome per transaction that
    /// survived preparation.
    pub async fn run(
        &self,
        identities: &[Identity],
        pool: &EndpointPool,
    ) -> BlastResult<Vec<BroadcastOutcome>> {
        // Fee computation happens exactly once, against the primary; its
        // failure aborts the run before any transaction work begins.
        let estimator = FeeEstimator::new(
            self.settings.priority_gwei,
            self.settings.fee_multiplier,
            self.settings.gas_limit,
        );
        let fees = estimator.compute(pool.primary().as_ref()).await?;
        info!(
            "Fee profile: ceiling {} wei, tip {} wei, gas limit {}, chain {}",
            fees.max_fee_per_gas, fees.max_priority_fee_per_gas, fees.gas_limit, fees.chain_id
        );

        // Prepare every identity concurrently; each failure is absorbed at
        // its own scope.
        let prepared = join_all(
            identities
                .iter()
                .map(|identity| self.prepare_identity(identity, &fees, pool)),
        )
        .await;

        let mut signed: Vec<SignedTransaction> = Vec::new();
        let mut survivors = 0usize;
        for result in prepared {
            match result {
                Ok(batch) => {
                    survivors += 1;
                    signed.extend(batch);
                }
                Err(e) => warn!("Dropping identity: {}", e),
            }
        }

        if survivors == 0 {
            return Err(BlastError::NothingToBroadcast);
        }
        info!(
            "Racing {} transactions from {} identities across {} endpoints",
            signed.len(),
            survivors,
            pool.len()
        );

        // No ordering between transactions, even within one identity's
        // sequence; the chain enforces nonce order at inclusion time.
        let racer = BroadcastRacer::new(self.settings.submit_timeout, !self.settings.pure_spam);
        let outcomes = join_all(signed.iter().map(|tx| racer.race(tx, pool))).await;

        Ok(outcomes)
    }

    /// Resolve one identity's starting nonce and build its full signed batch
    /// offline. Any failure here drops only this identity.
    async fn prepare_identity(
        &self,
        identity: &Identity,
        fees: &FeeProfile,
        pool: &EndpointPool,
    ) -> BlastResult<Vec<SignedTransaction>> {
        let mut sequence = NonceSequence::resolve(pool.primary().as_ref(), identity.address).await?;

        let mut batch = Vec::with_capacity(identity.count);
        for _ in 0..identity.count {
            let nonce = sequence.next();
            let tx = build_signed(
                identity,
                nonce,
                fees,
                self.settings.target,
                self.settings.value,
                &self.settings.payload,
            )
            .await?;
            debug!("Built transaction {:?} nonce {}", tx.hash, nonce);
            batch.push(tx);
        }

        info!(
            "Prepared {} transactions for {:?}",
            batch.len(),
            identity.address
        );
        Ok(batch)
    }
}
