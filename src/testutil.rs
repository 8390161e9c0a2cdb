//! Shared test doubles: configurable stub endpoints and fixtures

use crate::chain::Endpoint;
use crate::config::Settings;
use crate::error::{BlastError, BlastResult};
use crate::identity::Identity;
use crate::tx::{FeeProfile, SignedTransaction};

use async_trait::async_trait;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes, H256, U256};
use ethers::utils::keccak256;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub enum SubmitBehavior {
    Accept,
    Reject,
    Hang,
}

/// Stub endpoint with scriptable behavior per query
pub struct StubEndpoint {
    url: String,
    submit: SubmitBehavior,
    reachable: bool,
    base_fee: Option<U256>,
    suggested: (U256, U256),
    transaction_count: u64,
    fail_count_for: Option<Address>,
    chain_id: u64,
    sent: AtomicUsize,
}

impl StubEndpoint {
    fn new(url: &str, submit: SubmitBehavior, reachable: bool) -> Self {
        Self {
            url: url.to_string(),
            submit,
            reachable,
            base_fee: Some(U256::from(10_000_000_000u64)),
            suggested: (U256::from(20_000_000_000u64), U256::from(1_000_000_000u64)),
            transaction_count: 0,
            fail_count_for: None,
            chain_id: 1,
            sent: AtomicUsize::new(0),
        }
    }

    pub fn accepting(url: &str) -> Self {
        Self::new(url, SubmitBehavior::Accept, true)
    }

    pub fn rejecting(url: &str) -> Self {
        Self::new(url, SubmitBehavior::Reject, true)
    }

    pub fn hanging(url: &str) -> Self {
        Self::new(url, SubmitBehavior::Hang, true)
    }

    pub fn unreachable(url: &str) -> Self {
        Self::new(url, SubmitBehavior::Reject, false)
    }

    pub fn with_base_fee(mut self, wei: u64) -> Self {
        self.base_fee = Some(U256::from(wei));
        self
    }

    pub fn without_base_fee(mut self) -> Self {
        self.base_fee = None;
        self
    }

    pub fn with_suggested_fees(mut self, max_fee: u64, tip: u64) -> Self {
        self.suggested = (U256::from(max_fee), U256::from(tip));
        self
    }

    pub fn with_transaction_count(mut self, count: u64) -> Self {
        self.transaction_count = count;
        self
    }

    /// Fail nonce queries for exactly one address, for partial-failure tests
    pub fn failing_count_for(mut self, address: Address) -> Self {
        self.fail_count_for = Some(address);
        self
    }

    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    fn error(&self, message: &str) -> BlastError {
        BlastError::Endpoint {
            url: self.url.clone(),
            message: message.to_string(),
        }
    }

    fn check_reachable(&self) -> BlastResult<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(self.error("connection refused"))
        }
    }
}

#[async_trait]
impl Endpoint for StubEndpoint {
    fn url(&self) -> &str {
        &self.url
    }

    async fn send_raw(&self, raw: Bytes) -> BlastResult<H256> {
        self.check_reachable()?;
        self.sent.fetch_add(1, Ordering::SeqCst);
        match self.submit {
            SubmitBehavior::Accept => Ok(H256::from(keccak256(&raw))),
            SubmitBehavior::Reject => Err(self.error("execution reverted")),
            SubmitBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(self.error("hung"))
            }
        }
    }

    async fn base_fee(&self) -> BlastResult<Option<U256>> {
        self.check_reachable()?;
        Ok(self.base_fee)
    }

    async fn suggest_fees(&self) -> BlastResult<(U256, U256)> {
        self.check_reachable()?;
        Ok(self.suggested)
    }

    async fn transaction_count(&self, address: Address) -> BlastResult<u64> {
        self.check_reachable()?;
        if self.fail_count_for == Some(address) {
            return Err(self.error("nonce query failed"));
        }
        Ok(self.transaction_count)
    }

    async fn chain_id(&self) -> BlastResult<u64> {
        self.check_reachable()?;
        Ok(self.chain_id)
    }
}

const TEST_KEYS: [&str; 2] = [
    "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
    "6c3699283bda56ad74f6b855546325b68d482e983852a7a82979cc4807b6b0f4",
];

pub fn test_identity() -> Identity {
    test_identity_n(0, 1)
}

pub fn test_identity_n(index: usize, count: usize) -> Identity {
    let wallet: LocalWallet = TEST_KEYS[index].parse().unwrap();
    let address = wallet.address();
    Identity {
        wallet,
        address,
        count,
    }
}

pub fn test_fees() -> FeeProfile {
    FeeProfile::new(
        U256::from(50_000_000_000u64),
        U256::from(2_000_000_000u64),
        U256::from(300_000u64),
        1,
    )
}

/// Fabricated signed transaction for racer tests; the racer treats the
/// encoding as opaque bytes.
pub fn signed_fixture(nonce: u64) -> SignedTransaction {
    let raw: Bytes = vec![0x02, nonce as u8, 0xde, 0xad].into();
    let hash = H256::from(keccak256(&raw));
    SignedTransaction {
        from: Address::repeat_byte(0x11),
        nonce,
        raw,
        hash,
    }
}

pub fn test_settings() -> Settings {
    Settings {
        keys_path: PathBuf::from("keys.txt"),
        rpc_urls: vec!["http://localhost:8545".to_string()],
        target: "0x1f9090aaE28b8a3dCeaDf281B0F12828e676c326"
            .parse()
            .unwrap(),
        value: U256::zero(),
        payload: vec![0x12, 0x49, 0xc5, 0x8b].into(),
        count: 1,
        gas_limit: 300_000,
        priority_gwei: 2,
        fee_multiplier: 2,
        submit_timeout: Duration::from_secs(5),
        pure_spam: false,
    }
}
