//! txblast - high-throughput transaction broadcast racer
//!
//! Computes competitive fee parameters once, builds sequentially-nonced
//! signed transactions per identity fully offline, and races each one across
//! every configured endpoint, resolving on first acceptance.

use anyhow::Result;
use tracing::{info, warn};

mod chain;
mod config;
mod error;
mod identity;
mod orchestrator;
#[cfg(test)]
mod testutil;
mod tx;

use chain::EndpointPool;
use config::Settings;
use orchestrator::Orchestrator;
use tx::RaceResult;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("Starting txblast v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::from_env()?;
    let identities = identity::load_identities(&settings.keys_path, settings.count)?;
    let pool = EndpointPool::from_urls(&settings.rpc_urls)?;
    info!(
        "Endpoint pool of {}, primary {}",
        pool.len(),
        pool.primary().url()
    );

    let outcomes = Orchestrator::new(settings.clone())
        .run(&identities, &pool)
        .await?;

    // One report line per outcome; no requested transaction is silently lost.
    let mut accepted = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            RaceResult::Accepted { endpoint, tx_hash } => {
                accepted += 1;
                println!(
                    "{:?} nonce {} -> {:?} via {}",
                    outcome.from, outcome.nonce, tx_hash, endpoint
                );
            }
            RaceResult::AllRejected => {
                println!(
                    "{:?} nonce {} -> FAILED: no endpoint accepted",
                    outcome.from, outcome.nonce
                );
            }
        }
    }

    if accepted < outcomes.len() {
        warn!(
            "{} of {} transactions were not accepted anywhere",
            outcomes.len() - accepted,
            outcomes.len()
        );
    }
    info!("{}/{} transactions accepted", accepted, outcomes.len());

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,txblast=debug,hyper=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
