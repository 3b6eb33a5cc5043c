//! Vertex State Types
//!
//! Curve snapshot, quotes and trade execution state.

use num_traits::Zero;
use serde::{Deserialize, Serialize};

use vertex_core::{Direction, TxHash, Wei};

/// Snapshot of the curve contract. `None` means not yet read, or the read failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurveState {
    /// Current floor price per whole token
    pub spot_price: Option<Wei>,
    pub total_supply: Option<Wei>,
    /// ETH held by the contract
    pub pool_balance: Option<Wei>,
}

/// Curve snapshot plus the tracked account's token balance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainState {
    pub curve: CurveState,
    pub balance: Option<Wei>,
}

/// Quote for a prospective trade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub direction: Direction,
    /// ETH to spend (buy) or tokens to sell (sell)
    pub input_amount: Wei,
    /// Tokens bought or sold
    pub token_amount: Wei,
    /// ETH cost (buy) or return (sell) from the contract; `None` until resolved
    pub price_amount: Option<Wei>,
}

impl Quote {
    pub fn empty(direction: Direction) -> Self {
        Self {
            direction,
            input_amount: Wei::zero(),
            token_amount: Wei::zero(),
            price_amount: None,
        }
    }

    /// Both the token quantity and the price are known and non-zero
    pub fn is_executable(&self) -> bool {
        !self.token_amount.is_zero() && self.price_amount.as_ref().is_some_and(|p| !p.is_zero())
    }
}

/// Lifecycle of a submitted trade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradePhase {
    #[default]
    Idle,
    Pending,
    Confirming,
    Success,
    Failed,
}

impl TradePhase {
    /// Submitted and not yet resolved
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirming)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Confirming => "confirming",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// State of one trade submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeExecution {
    pub hash: Option<TxHash>,
    pub phase: TradePhase,
    /// Failure reason when `phase` is `Failed`
    pub error: Option<String>,
}

impl TradeExecution {
    pub fn pending() -> Self {
        Self {
            hash: None,
            phase: TradePhase::Pending,
            error: None,
        }
    }

    pub fn confirming(hash: TxHash) -> Self {
        Self {
            hash: Some(hash),
            phase: TradePhase::Confirming,
            error: None,
        }
    }

    pub fn succeeded(hash: TxHash) -> Self {
        Self {
            hash: Some(hash),
            phase: TradePhase::Success,
            error: None,
        }
    }

    pub fn failed(hash: Option<TxHash>, error: impl Into<String>) -> Self {
        Self {
            hash,
            phase: TradePhase::Failed,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_executable() {
        let mut quote = Quote::empty(Direction::Buy);
        assert!(!quote.is_executable());

        quote.token_amount = Wei::from(100);
        assert!(!quote.is_executable());

        quote.price_amount = Some(Wei::zero());
        assert!(!quote.is_executable());

        quote.price_amount = Some(Wei::from(1000));
        assert!(quote.is_executable());
    }

    #[test]
    fn test_trade_phase() {
        assert!(TradePhase::Pending.is_busy());
        assert!(TradePhase::Confirming.is_busy());
        assert!(!TradePhase::Idle.is_busy());
        assert!(TradePhase::Failed.is_terminal());
        assert!(!TradePhase::Confirming.is_terminal());
    }

    #[test]
    fn test_execution_serialization() {
        let exec = TradeExecution::confirming(TxHash::new("0xabc"));
        let json = serde_json::to_value(&exec).unwrap();
        assert_eq!(json["phase"], "confirming");
        assert_eq!(json["hash"], "0xabc");
        assert!(json["error"].is_null());
    }
}
