//! RPC endpoint status probing
//!
//! Detects whether the endpoint is reachable and serving the expected chain.

use ethers::providers::{Http, Middleware, Provider};
use serde::{Deserialize, Serialize};

/// Endpoint status detected through probing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainStatus {
    /// Endpoint is reachable and responding
    pub is_online: bool,

    /// Chain id reported by the endpoint
    pub chain_id: Option<u64>,

    /// Chain id the client was configured for
    pub expected_chain_id: u64,

    /// Latest block number
    pub block_number: u64,
}

impl ChainStatus {
    /// True when the endpoint reports a different chain than configured
    pub fn chain_mismatch(&self) -> bool {
        self.chain_id.is_some_and(|id| id != self.expected_chain_id)
    }
}

/// Probe the endpoint for chain id and head block
pub async fn detect_status(provider: &Provider<Http>, expected_chain_id: u64) -> ChainStatus {
    let block_number = match provider.get_block_number().await {
        Ok(n) => n.as_u64(),
        Err(e) => {
            tracing::warn!("RPC endpoint did not answer eth_blockNumber: {}", e);
            return ChainStatus {
                is_online: false,
                chain_id: None,
                expected_chain_id,
                block_number: 0,
            };
        }
    };

    let chain_id = provider.get_chainid().await.ok().map(|id| id.as_u64());

    let status = ChainStatus {
        is_online: true,
        chain_id,
        expected_chain_id,
        block_number,
    };
    if status.chain_mismatch() {
        tracing::warn!(
            "RPC endpoint serves chain {:?}, expected {}",
            status.chain_id,
            expected_chain_id
        );
    }
    status
}
