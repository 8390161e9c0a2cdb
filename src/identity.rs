//! Signing identities loaded from a line-delimited credential file
//!
//! Each line is either `private_key` or `private_key,count`. Malformed or
//! empty lines are skipped with a warning so a bad entry never blocks the
//! rest of the file.

use crate::error::{BlastError, BlastResult};

use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use std::path::Path;
use tracing::{info, warn};

/// A signing credential, its derived address, and its requested batch size
#[derive(Debug, Clone)]
pub struct Identity {
    pub wallet: LocalWallet,
    pub address: Address,
    pub count: usize,
}

impl Identity {
    fn parse(line: &str, default_count: usize) -> Option<Self> {
        let mut parts = line.splitn(2, ',');
        let key = parts.next()?.trim();

        let count = match parts.next() {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => return None,
            },
            None => default_count,
        };

        let wallet: LocalWallet = key.parse().ok()?;
        let address = wallet.address();
        Some(Self {
            wallet,
            address,
            count,
        })
    }
}

/// Load identities from a credential file, skipping malformed entries
pub fn load_identities(path: &Path, default_count: usize) -> BlastResult<Vec<Identity>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        BlastError::Credential(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let mut identities = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match Identity::parse(line, default_count) {
            Some(identity) => identities.push(identity),
            None => warn!("Skipping malformed credential on line {}", idx + 1),
        }
    }

    if identities.is_empty() {
        return Err(BlastError::Credential(format!(
            "No usable credentials in {}",
            path.display()
        )));
    }

    info!("Loaded {} identities", identities.len());
    Ok(identities)
}
