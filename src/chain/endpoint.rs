//! Endpoint abstraction over a remote execution node
//!
//! The trait is the seam between the broadcast logic and the wire: the fee
//! estimator, nonce sequencer, and racer all speak to `dyn Endpoint`, which
//! keeps them testable against stubs.

use crate::error::{BlastError, BlastResult};

use async_trait::async_trait;
use ethers::providers::{Http, JsonRpcClient, Middleware, Provider};
use ethers::types::{Address, BlockNumber, Bytes, H256, U256};
use std::time::Duration;
use tracing::debug;

/// A remote node accepting raw transactions and chain-state queries
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Endpoint address, for logging and outcome attribution
    fn url(&self) -> &str;

    /// Submit a raw signed transaction, returning the assigned hash
    async fn send_raw(&self, raw: Bytes) -> BlastResult<H256>;

    /// Base fee of the pending block, falling back to the latest block.
    /// `None` when neither header carries one.
    async fn base_fee(&self) -> BlastResult<Option<U256>>;

    /// Generic EIP-1559 fee estimate: (max fee, priority fee)
    async fn suggest_fees(&self) -> BlastResult<(U256, U256)>;

    /// Transaction count for an address, including pending transactions
    async fn transaction_count(&self, address: Address) -> BlastResult<u64>;

    /// Chain identifier reported by the node
    async fn chain_id(&self) -> BlastResult<u64>;
}

/// JSON-RPC endpoint over any transport
pub struct RpcEndpoint<P> {
    url: String,
    provider: Provider<P>,
}

/// HTTP JSON-RPC endpoint
pub type HttpEndpoint = RpcEndpoint<Http>;

impl RpcEndpoint<Http> {
    pub fn new(url: &str) -> BlastResult<Self> {
        let provider = Provider::<Http>::try_from(url)
            .map_err(|e| BlastError::Endpoint {
                url: url.to_string(),
                message: format!("Invalid endpoint URL: {}", e),
            })?
            .interval(Duration::from_millis(100));

        Ok(Self {
            url: url.to_string(),
            provider,
        })
    }
}

impl<P> RpcEndpoint<P> {
    fn error(&self, message: impl ToString) -> BlastError {
        BlastError::Endpoint {
            url: self.url.clone(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl<P: JsonRpcClient> Endpoint for RpcEndpoint<P> {
    fn url(&self) -> &str {
        &self.url
    }

    async fn send_raw(&self, raw: Bytes) -> BlastResult<H256> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| self.error(e))?;
        let tx_hash = pending.tx_hash();
        debug!("Endpoint {} accepted transaction {:?}", self.url, tx_hash);
        Ok(tx_hash)
    }

    async fn base_fee(&self) -> BlastResult<Option<U256>> {
        // Many hosted RPCs reject the `pending` block tag; a rejected tag is
        // not an unreachable node, so fall through to the next one. Only when
        // every tag fails is the endpoint itself the problem.
        let mut last_err = None;
        let mut answered = false;

        for block_number in [BlockNumber::Pending, BlockNumber::Latest] {
            match self.provider.get_block(block_number).await {
                Ok(block) => {
                    answered = true;
                    if let Some(base_fee) = block.and_then(|b| b.base_fee_per_gas) {
                        return Ok(Some(base_fee));
                    }
                }
                Err(e) => {
                    debug!(
                        "Endpoint {} {:?} header query failed: {}",
                        self.url, block_number, e
                    );
                    last_err = Some(self.error(e));
                }
            }
        }

        match last_err {
            Some(err) if !answered => Err(err),
            _ => Ok(None),
        }
    }

    async fn suggest_fees(&self) -> BlastResult<(U256, U256)> {
        self.provider
            .estimate_eip1559_fees(None)
            .await
            .map_err(|e| self.error(e))
    }

    async fn transaction_count(&self, address: Address) -> BlastResult<u64> {
        let count = self
            .provider
            .get_transaction_count(address, Some(BlockNumber::Pending.into()))
            .await
            .map_err(|e| self.error(e))?;
        Ok(count.as_u64())
    }

    async fn chain_id(&self) -> BlastResult<u64> {
        let id = self.provider.get_chainid().await.map_err(|e| self.error(e))?;
        Ok(id.as_u64())
    }
}
