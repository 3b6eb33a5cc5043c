//! evm-client: JSON-RPC access to the Vertex bonding curve contract
//!
//! Wraps an ethers provider with per-request timeouts, an optional signer for
//! trade submission, and endpoint status probing. Implements
//! [`vertex_core::CurveLedger`] so the quote engine and trade coordinator can
//! run against a live chain.

pub mod contract;
pub mod convert;
pub mod status;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address as EthAddress, U64};
use tokio::sync::RwLock;
use vertex_core::{Address, AppConfig, CurveLedger, LedgerError, ReceiptStatus, RpcConfig, TxHash, Wei};

pub use contract::VertexContract;
pub use status::ChainStatus;

use convert::{eth_address, h256_from_tx_hash, tx_hash_from_h256, u256_from_wei, wei_from_u256};

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Curve contract client with optional signing key
#[derive(Clone)]
pub struct EvmClient {
    provider: Arc<Provider<Http>>,
    reader: VertexContract<Provider<Http>>,
    writer: Option<VertexContract<SignerClient>>,
    contract_address: EthAddress,
    account: Option<Address>,
    status: Arc<RwLock<Option<ChainStatus>>>,
    config: RpcConfig,
}

impl EvmClient {
    /// Create a new client and probe the endpoint
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let client = Self::new_without_probe(config)?;
        client.refresh_status().await;
        Ok(client)
    }

    /// Create without probing (for testing or when the endpoint may be offline)
    pub fn new_without_probe(config: &AppConfig) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.rpc.url.as_str()).map_err(|e| {
            LedgerError::Unreachable {
                url: format!("{}: {}", config.rpc.url, e),
            }
        })?;
        let provider = Arc::new(provider);

        let contract_address = eth_address(&Address::parse(&config.contract_address)?)?;
        let reader = VertexContract::new(contract_address, provider.clone());

        let mut account = config.account.as_deref().map(Address::parse).transpose()?;

        let writer = match config.private_key.as_deref() {
            Some(key) => {
                let wallet = key
                    .parse::<LocalWallet>()
                    .map_err(|e| LedgerError::InvalidResponse(format!("invalid signing key: {}", e)))?
                    .with_chain_id(config.rpc.chain_id);
                if account.is_none() {
                    account = Some(Address::new(format!("{:?}", wallet.address())));
                }
                let signer = SignerMiddleware::new((*provider).clone(), wallet);
                Some(VertexContract::new(contract_address, Arc::new(signer)))
            }
            None => None,
        };

        tracing::info!(
            "Curve client for {:?} via {} (signer: {})",
            contract_address,
            config.rpc.url,
            if writer.is_some() { "yes" } else { "no" }
        );

        Ok(Self {
            provider,
            reader,
            writer,
            contract_address,
            account,
            status: Arc::new(RwLock::new(None)),
            config: config.rpc.clone(),
        })
    }

    /// Get the current RPC configuration
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Account whose balance is tracked, if any
    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    pub fn can_sign(&self) -> bool {
        self.writer.is_some()
    }

    /// Refresh endpoint status
    pub async fn refresh_status(&self) {
        let status = status::detect_status(&self.provider, self.config.chain_id).await;
        let mut lock = self.status.write().await;
        *lock = Some(status);
    }

    /// Get the last probed status (may be stale if not recently refreshed)
    pub async fn status(&self) -> Option<ChainStatus> {
        self.status.read().await.clone()
    }

    fn writer(&self, action: &'static str) -> Result<&VertexContract<SignerClient>> {
        self.writer.as_ref().ok_or(LedgerError::NoSigner { action })
    }

    fn timeout(&self) -> Duration {
        self.config.request_timeout()
    }
}

#[async_trait]
impl CurveLedger for EvmClient {
    async fn spot_price(&self) -> Result<Wei> {
        let price = timed_request(self.timeout(), self.reader.get_spot_price().call()).await?;
        Ok(wei_from_u256(price))
    }

    async fn total_supply(&self) -> Result<Wei> {
        let supply = timed_request(self.timeout(), self.reader.total_supply().call()).await?;
        Ok(wei_from_u256(supply))
    }

    async fn pool_balance(&self) -> Result<Wei> {
        let balance = timed_request(
            self.timeout(),
            self.provider.get_balance(self.contract_address, None),
        )
        .await?;
        Ok(wei_from_u256(balance))
    }

    async fn buy_price(&self, token_amount: &Wei) -> Result<Wei> {
        let amount = u256_from_wei(token_amount)?;
        let price = timed_request(self.timeout(), self.reader.get_buy_price(amount).call()).await?;
        Ok(wei_from_u256(price))
    }

    async fn sell_price(&self, token_amount: &Wei) -> Result<Wei> {
        let amount = u256_from_wei(token_amount)?;
        let price =
            timed_request(self.timeout(), self.reader.get_sell_price(amount).call()).await?;
        Ok(wei_from_u256(price))
    }

    async fn balance_of(&self, holder: &Address) -> Result<Wei> {
        let holder = eth_address(holder)?;
        let balance = timed_request(self.timeout(), self.reader.balance_of(holder).call()).await?;
        Ok(wei_from_u256(balance))
    }

    async fn buy(&self, token_amount: &Wei, max_eth_cost: &Wei) -> Result<TxHash> {
        let writer = self.writer("buy")?;
        let amount = u256_from_wei(token_amount)?;
        let max_cost = u256_from_wei(max_eth_cost)?;

        let call = writer.buy(amount, max_cost).value(max_cost);
        let pending = timed_request(self.timeout(), call.send()).await?;
        Ok(tx_hash_from_h256(pending.tx_hash()))
    }

    async fn sell(&self, token_amount: &Wei, min_eth_return: &Wei) -> Result<TxHash> {
        let writer = self.writer("sell")?;
        let amount = u256_from_wei(token_amount)?;
        let min_return = u256_from_wei(min_eth_return)?;

        let call = writer.sell(amount, min_return);
        let pending = timed_request(self.timeout(), call.send()).await?;
        Ok(tx_hash_from_h256(pending.tx_hash()))
    }

    async fn receipt_status(&self, hash: &TxHash) -> Result<Option<ReceiptStatus>> {
        let h256 = h256_from_tx_hash(hash)?;
        let receipt =
            timed_request(self.timeout(), self.provider.get_transaction_receipt(h256)).await?;

        Ok(receipt.map(|r| {
            if r.status == Some(U64::from(1)) {
                ReceiptStatus::Success
            } else {
                ReceiptStatus::Reverted
            }
        }))
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

async fn timed_request<T, E: std::fmt::Display>(
    timeout: Duration,
    fut: impl std::future::Future<Output = std::result::Result<T, E>>,
) -> Result<T> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| LedgerError::Timeout {
            secs: timeout.as_secs(),
        })?
        .map_err(|e| LedgerError::ApiError {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_read_only_client() {
        let client = EvmClient::new_without_probe(&test_config()).unwrap();
        assert!(!client.can_sign());
        assert!(client.account().is_none());
    }

    #[test]
    fn test_signer_provides_account() {
        let mut config = test_config();
        // well-known anvil development key #0
        config.private_key =
            Some("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string());
        let client = EvmClient::new_without_probe(&config).unwrap();
        assert!(client.can_sign());
        assert_eq!(
            client.account().map(|a| a.as_str().to_lowercase()),
            Some("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string())
        );
    }

    #[test]
    fn test_invalid_contract_address() {
        let mut config = test_config();
        config.contract_address = "0x1234".to_string();
        assert!(matches!(
            EvmClient::new_without_probe(&config),
            Err(LedgerError::InvalidAddress { .. })
        ));
    }

    #[tokio::test]
    async fn test_write_without_signer() {
        let client = EvmClient::new_without_probe(&test_config()).unwrap();
        let err = client
            .buy(&Wei::from(100), &Wei::from(1050))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NoSigner { action: "buy" }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_request_times_out() {
        let fut = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, LedgerError>(1)
        };
        let err = timed_request(Duration::from_secs(30), fut).await.unwrap_err();
        assert!(matches!(err, LedgerError::Timeout { secs: 30 }));
    }
}
