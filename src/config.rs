//! Configuration management for txblast
//!
//! Builds one immutable `Settings` value from environment variables at
//! startup. No component reads the environment directly; everything flows
//! through this struct.

use anyhow::{Context, Result};
use ethers::types::{Address, Bytes, U256};
use lazy_static::lazy_static;
use regex::Regex;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

lazy_static! {
    static ref ADDRESS_RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
}

/// Root configuration structure, constructed once and shared read-only
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the line-delimited credential file
    pub keys_path: PathBuf,
    /// RPC endpoint pool; first entry is the primary for chain-state queries
    pub rpc_urls: Vec<String>,
    /// Target contract address
    pub target: Address,
    /// Native value attached to every transaction, in wei
    pub value: U256,
    /// Encoded call data sent with every transaction
    pub payload: Bytes,
    /// Default transactions per identity when the credential line carries none
    pub count: usize,
    /// Gas limit ceiling per transaction
    pub gas_limit: u64,
    /// Priority tip in gwei
    pub priority_gwei: u64,
    /// Base fee multiplier for the fee ceiling (integral, >= 1)
    pub fee_multiplier: u64,
    /// Per-submission timeout bounding every race
    pub submit_timeout: Duration,
    /// Skip draining losing submissions' acknowledgments after a race
    /// settles. The race itself still waits for the winning acceptance;
    /// there is no submission path that skips it.
    pub pure_spam: bool,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from an arbitrary variable source
    fn from_lookup<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let keys_path = var("TXBLAST_KEYS")
            .map(PathBuf::from)
            .context("TXBLAST_KEYS not set (credential file path)")?;

        let rpc_urls: Vec<String> = var("TXBLAST_RPC_URLS")
            .context("TXBLAST_RPC_URLS not set (comma-separated endpoint list)")?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if rpc_urls.is_empty() {
            anyhow::bail!("TXBLAST_RPC_URLS contains no endpoints");
        }

        let target_raw = var("TXBLAST_TARGET").context("TXBLAST_TARGET not set")?;
        if !ADDRESS_RE.is_match(&target_raw) {
            anyhow::bail!("Invalid target address: {}", target_raw);
        }
        let target: Address = target_raw
            .parse()
            .with_context(|| format!("Invalid target address: {}", target_raw))?;

        let value = match var("TXBLAST_VALUE_WEI") {
            Some(raw) => U256::from_dec_str(raw.trim())
                .with_context(|| format!("Invalid TXBLAST_VALUE_WEI: {}", raw))?,
            None => U256::zero(),
        };

        let payload_raw = var("TXBLAST_PAYLOAD").context("TXBLAST_PAYLOAD not set")?;
        let payload_hex = payload_raw.trim().trim_start_matches("0x");
        if payload_hex.is_empty() {
            anyhow::bail!("TXBLAST_PAYLOAD is empty");
        }
        let payload: Bytes = hex::decode(payload_hex)
            .with_context(|| format!("Invalid hex payload: {}", payload_raw))?
            .into();

        let count = parse_or(&var, "TXBLAST_COUNT", 1usize)?;
        if count == 0 {
            anyhow::bail!("TXBLAST_COUNT must be at least 1");
        }

        let gas_limit = parse_or(&var, "TXBLAST_GAS_LIMIT", 300_000u64)?;
        let priority_gwei = parse_or(&var, "TXBLAST_PRIORITY_GWEI", 2u64)?;
        let fee_multiplier = parse_or(&var, "TXBLAST_FEE_MULTIPLIER", 2u64)?;
        if fee_multiplier == 0 {
            anyhow::bail!("TXBLAST_FEE_MULTIPLIER must be at least 1");
        }

        let submit_timeout_secs = parse_or(&var, "TXBLAST_SUBMIT_TIMEOUT_SECS", 5u64)?;
        let pure_spam = var("TXBLAST_PURE_SPAM")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            keys_path,
            rpc_urls,
            target,
            value,
            payload,
            count,
            gas_limit,
            priority_gwei,
            fee_multiplier,
            submit_timeout: Duration::from_secs(submit_timeout_secs),
            pure_spam,
        })
    }
}

fn parse_or<F, T>(var: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {} ({})", name, raw, e)),
        None => Ok(default),
    }
}
