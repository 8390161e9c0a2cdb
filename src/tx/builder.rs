//! Offline transaction construction and signing
//!
//! Builds and signs an entire batch before any transmission begins, so the
//! gap between "decision to send" and the first broadcast byte is pure wire
//! latency. No network I/O happens here.

use super::fees::FeeProfile;
use crate::error::{BlastError, BlastResult};
use crate::identity::Identity;

use ethers::signers::Signer;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, Eip1559TransactionRequest, H256, U256};
use ethers::utils::keccak256;

/// Immutable signed transaction, bound to one identity and one nonce
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub from: Address,
    pub nonce: u64,
    pub raw: Bytes,
    pub hash: H256,
}

/// Build and sign one transaction against the shared fee profile.
///
/// Deterministic for fixed inputs; ethers signs with RFC-6979 nonces, so
/// identical inputs produce identical encodings.
pub async fn build_signed(
    identity: &Identity,
    nonce: u64,
    fees: &FeeProfile,
    target: Address,
    value: U256,
    payload: &Bytes,
) -> BlastResult<SignedTransaction> {
    let request = Eip1559TransactionRequest::new()
        .from(identity.address)
        .to(target)
        .data(payload.clone())
        .value(value)
        .nonce(nonce)
        .gas(fees.gas_limit)
        .max_fee_per_gas(fees.max_fee_per_gas)
        .max_priority_fee_per_gas(fees.max_priority_fee_per_gas)
        .chain_id(fees.chain_id);

    let tx = TypedTransaction::Eip1559(request);
    let wallet = identity.wallet.clone().with_chain_id(fees.chain_id);

    let signature = wallet
        .sign_transaction(&tx)
        .await
        .map_err(|e| BlastError::Signer {
            address: identity.address,
            message: e.to_string(),
        })?;

    let raw = tx.rlp_signed(&signature);
    let hash = H256::from(keccak256(&raw));

    Ok(SignedTransaction {
        from: identity.address,
        nonce,
        raw,
        hash,
    })
}
