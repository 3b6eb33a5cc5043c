//! Ledger interface for the bonding curve contract
//!
//! Everything the client needs from the chain: curve reads, the caller's
//! balance, the two trade writes and receipt lookup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;
use crate::types::{Address, TxHash, Wei};

/// Outcome recorded in a mined transaction receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

#[async_trait]
pub trait CurveLedger: Send + Sync {
    /// `getSpotPrice()`
    async fn spot_price(&self) -> Result<Wei, LedgerError>;

    /// `totalSupply()`
    async fn total_supply(&self) -> Result<Wei, LedgerError>;

    /// Native balance held by the curve contract
    async fn pool_balance(&self) -> Result<Wei, LedgerError>;

    /// `getBuyPrice(tokenAmount)`
    async fn buy_price(&self, token_amount: &Wei) -> Result<Wei, LedgerError>;

    /// `getSellPrice(tokenAmount)`
    async fn sell_price(&self, token_amount: &Wei) -> Result<Wei, LedgerError>;

    /// `balanceOf(holder)`
    async fn balance_of(&self, holder: &Address) -> Result<Wei, LedgerError>;

    /// `buy(tokenAmount, maxEthCost)` with `maxEthCost` attached as value
    async fn buy(&self, token_amount: &Wei, max_eth_cost: &Wei) -> Result<TxHash, LedgerError>;

    /// `sell(tokenAmount, minEthReturn)`
    async fn sell(&self, token_amount: &Wei, min_eth_return: &Wei)
        -> Result<TxHash, LedgerError>;

    /// Receipt status, `None` while the transaction is not yet mined
    async fn receipt_status(&self, hash: &TxHash) -> Result<Option<ReceiptStatus>, LedgerError>;
}
