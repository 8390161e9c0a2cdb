//! Error types for txblast

use ethers::types::Address;
use thiserror::Error;

/// Main error type for the broadcaster
#[derive(Error, Debug)]
pub enum BlastError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Endpoint error from {url}: {message}")]
    Endpoint { url: String, message: String },

    #[error("Fee estimation error: {0}")]
    Fees(String),

    #[error("Nonce resolution error for {address:?}: {message}")]
    Nonce { address: Address, message: String },

    #[error("Signing error for {address:?}: {message}")]
    Signer { address: Address, message: String },

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("No identities survived preparation, nothing to broadcast")]
    NothingToBroadcast,
}

impl BlastError {
    /// Fatal errors abort the whole run; the rest are absorbed at the
    /// identity or transaction scope they belong to.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BlastError::Config(_) | BlastError::Fees(_) | BlastError::NothingToBroadcast
        )
    }
}

/// Result type for broadcaster operations
pub type BlastResult<T> = Result<T, BlastError>;
