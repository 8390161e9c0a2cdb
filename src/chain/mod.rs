//! Chain module - endpoint pool for broadcast fan-out
//!
//! The pool is built once from the configured URL list and never mutated
//! afterwards, so it is shared across races without locking. The first
//! endpoint is the primary and answers all chain-state queries.

pub mod endpoint;

pub use endpoint::{Endpoint, HttpEndpoint};

use crate::error::{BlastError, BlastResult};

use std::sync::Arc;
use tracing::{debug, warn};

/// Immutable pool of broadcast endpoints
pub struct EndpointPool {
    endpoints: Vec<Arc<dyn Endpoint>>,
}

impl EndpointPool {
    /// Build the pool from configured URLs, skipping unparseable entries
    pub fn from_urls(urls: &[String]) -> BlastResult<Self> {
        let mut endpoints: Vec<Arc<dyn Endpoint>> = Vec::new();

        for url in urls {
            match HttpEndpoint::new(url) {
                Ok(endpoint) => {
                    debug!("Added endpoint {}", url);
                    endpoints.push(Arc::new(endpoint));
                }
                Err(e) => warn!("Skipping endpoint {}: {}", url, e),
            }
        }

        Self::from_endpoints(endpoints)
    }

    /// Build the pool from already-constructed endpoints
    pub fn from_endpoints(endpoints: Vec<Arc<dyn Endpoint>>) -> BlastResult<Self> {
        let pool = Self { endpoints };
        if pool.is_empty() {
            return Err(BlastError::Config("No valid endpoints".to_string()));
        }
        Ok(pool)
    }

    /// Primary endpoint for chain-state queries
    pub fn primary(&self) -> &Arc<dyn Endpoint> {
        &self.endpoints[0]
    }

    /// All endpoints, in configured order
    pub fn endpoints(&self) -> &[Arc<dyn Endpoint>] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
