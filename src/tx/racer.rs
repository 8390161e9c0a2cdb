//! Broadcast race: one signed transaction against every endpoint at once
//!
//! Each endpoint gets its own bounded submission task; the first acceptance
//! settles a capacity-1 channel and becomes the outcome. Losing submissions
//! are never awaited for correctness and never cancelled - the transaction
//! is identical everywhere, so duplicate acceptances are idempotent and only
//! one inclusion can ever occur on-chain.

use super::builder::SignedTransaction;
use crate::chain::EndpointPool;

use ethers::types::{Address, H256};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::debug;

/// Terminal record for one transaction's race
#[derive(Debug, Clone)]
pub struct BroadcastOutcome {
    pub from: Address,
    pub nonce: u64,
    pub result: RaceResult,
}

#[derive(Debug, Clone)]
pub enum RaceResult {
    /// An endpoint accepted the submission and assigned this hash
    Accepted { endpoint: String, tx_hash: H256 },
    /// Every endpoint rejected or timed out
    AllRejected,
}

impl BroadcastOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self.result, RaceResult::Accepted { .. })
    }
}

/// Races submissions across the endpoint pool
pub struct BroadcastRacer {
    /// Bound on every individual submission; a hung endpoint can never
    /// stall the race past this.
    submit_timeout: Duration,
    /// Await losing submissions in a detached task after the race settles.
    /// Pure-spam mode skips the drain entirely.
    drain_losers: bool,
}

impl BroadcastRacer {
    pub fn new(submit_timeout: Duration, drain_losers: bool) -> Self {
        Self {
            submit_timeout,
            drain_losers,
        }
    }

    /// Submit to every endpoint concurrently and resolve on first acceptance.
    ///
    /// Always resolves within the submission timeout: every task is bounded
    /// by it, and once all senders drop the channel closes.
    pub async fn race(&self, signed: &SignedTransaction, pool: &EndpointPool) -> BroadcastOutcome {
        let (winner_tx, mut winner_rx) = mpsc::channel::<(String, H256)>(1);
        let mut handles = Vec::with_capacity(pool.len());

        for endpoint in pool.endpoints() {
            let endpoint = endpoint.clone();
            let raw = signed.raw.clone();
            let winner_tx = winner_tx.clone();
            let submit_timeout = self.submit_timeout;

            handles.push(tokio::spawn(async move {
                match timeout(submit_timeout, endpoint.send_raw(raw)).await {
                    Ok(Ok(tx_hash)) => {
                        // Full channel means another endpoint already won.
                        let _ = winner_tx.try_send((endpoint.url().to_string(), tx_hash));
                    }
                    Ok(Err(e)) => {
                        debug!("Endpoint {} rejected submission: {}", endpoint.url(), e);
                    }
                    Err(_) => {
                        debug!("Endpoint {} submission timed out", endpoint.url());
                    }
                }
            }));
        }
        drop(winner_tx);

        let result = match winner_rx.recv().await {
            Some((endpoint, tx_hash)) => RaceResult::Accepted { endpoint, tx_hash },
            None => RaceResult::AllRejected,
        };

        if self.drain_losers {
            let tx_hash = signed.hash;
            tokio::spawn(async move {
                for handle in handles {
                    let _ = handle.await;
                }
                debug!("Drained remaining submissions for {:?}", tx_hash);
            });
        }

        BroadcastOutcome {
            from: signed.from,
            nonce: signed.nonce,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Endpoint;
    use crate::testutil::{signed_fixture, StubEndpoint};
    use std::sync::Arc;

    fn racer() -> BroadcastRacer {
        BroadcastRacer::new(Duration::from_secs(5), true)
    }

    fn pool(endpoints: Vec<Arc<dyn Endpoint>>) -> EndpointPool {
        EndpointPool::from_endpoints(endpoints).unwrap()
    }

    #[tokio::test]
    async fn first_acceptance_wins() {
        let pool = pool(vec![
            Arc::new(StubEndpoint::rejecting("http://bad")),
            Arc::new(StubEndpoint::accepting("http://good")),
        ]);
        let signed = signed_fixture(3);

        let outcome = racer().race(&signed, &pool).await;
        match outcome.result {
            RaceResult::Accepted { endpoint, .. } => assert_eq!(endpoint, "http://good"),
            RaceResult::AllRejected => panic!("expected acceptance"),
        }
        assert_eq!(outcome.nonce, 3);
        assert_eq!(outcome.from, signed.from);
    }

    #[tokio::test]
    async fn duplicate_acceptances_collapse_to_one_outcome() {
        let pool = pool(vec![
            Arc::new(StubEndpoint::accepting("http://a")),
            Arc::new(StubEndpoint::accepting("http://b")),
            Arc::new(StubEndpoint::accepting("http://c")),
        ]);
        let signed = signed_fixture(0);

        let outcome = racer().race(&signed, &pool).await;
        assert!(outcome.is_accepted());
    }

    #[tokio::test]
    async fn all_rejections_yield_failure_outcome() {
        let pool = pool(vec![
            Arc::new(StubEndpoint::rejecting("http://a")),
            Arc::new(StubEndpoint::rejecting("http://b")),
        ]);
        let signed = signed_fixture(1);

        let outcome = racer().race(&signed, &pool).await;
        assert!(!outcome.is_accepted());
    }

    #[tokio::test(start_paused = true)]
    async fn winner_settles_without_awaiting_hung_submissions() {
        let pool = pool(vec![
            Arc::new(StubEndpoint::accepting("http://fast")),
            Arc::new(StubEndpoint::hanging("http://stuck")),
        ]);
        let signed = signed_fixture(7);

        let started = tokio::time::Instant::now();
        let outcome = racer().race(&signed, &pool).await;

        match outcome.result {
            RaceResult::Accepted { endpoint, .. } => assert_eq!(endpoint, "http://fast"),
            RaceResult::AllRejected => panic!("expected acceptance"),
        }
        // The hung loser holds its task for an hour; the race must settle on
        // the acceptance alone, nowhere near the submission timeout.
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_endpoints_resolve_within_the_timeout_bound() {
        let pool = pool(vec![
            Arc::new(StubEndpoint::hanging("http://stuck")),
            Arc::new(StubEndpoint::rejecting("http://b")),
        ]);
        let signed = signed_fixture(2);

        let started = tokio::time::Instant::now();
        let outcome = racer().race(&signed, &pool).await;
        assert!(!outcome.is_accepted());
        assert!(started.elapsed() <= Duration::from_secs(6));
    }

    #[tokio::test]
    async fn spam_mode_still_resolves_on_first_acceptance() {
        let pool = pool(vec![
            Arc::new(StubEndpoint::accepting("http://a")),
            Arc::new(StubEndpoint::rejecting("http://b")),
        ]);
        let signed = signed_fixture(4);

        let racer = BroadcastRacer::new(Duration::from_secs(5), false);
        let outcome = racer.race(&signed, &pool).await;
        assert!(outcome.is_accepted());
    }
}
