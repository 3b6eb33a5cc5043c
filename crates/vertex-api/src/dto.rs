//! Data Transfer Objects for API requests and responses
//!
//! Amounts cross the wire as decimal strings of the smallest unit, paired with
//! a human-readable rendering.

use serde::{Deserialize, Serialize};

use evm_client::ChainStatus;
use vertex::{format_amount, ChainState, CurvePoint, Quote, TradeExecution, TradeOrder};
use vertex_core::{Direction, Wei};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub chain_id: u64,
    pub contract: String,
}

impl HealthResponse {
    pub fn new(chain_id: u64, contract: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            chain_id,
            contract: contract.into(),
        }
    }
}

/// An on-chain amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountDto {
    /// Smallest units (wei), as a decimal string
    pub raw: String,
    /// 18-decimal rendering, trailing zeros trimmed
    pub formatted: String,
}

impl From<&Wei> for AmountDto {
    fn from(value: &Wei) -> Self {
        Self {
            raw: value.to_string(),
            formatted: format_amount(value, None),
        }
    }
}

fn amount(value: Option<&Wei>) -> Option<AmountDto> {
    value.map(AmountDto::from)
}

/// Curve snapshot and tracked balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResponse {
    pub spot_price: Option<AmountDto>,
    pub total_supply: Option<AmountDto>,
    pub pool_balance: Option<AmountDto>,
    pub account: Option<String>,
    pub balance: Option<AmountDto>,
    /// Any read still in flight; the values may be stale
    pub loading: bool,
}

impl StateResponse {
    pub fn new(state: &ChainState, account: Option<String>, loading: bool) -> Self {
        Self {
            spot_price: amount(state.curve.spot_price.as_ref()),
            total_supply: amount(state.curve.total_supply.as_ref()),
            pool_balance: amount(state.curve.pool_balance.as_ref()),
            account,
            balance: amount(state.balance.as_ref()),
            loading,
        }
    }
}

/// Quote request; `amount` is decimal text as typed (ETH for buys, tokens for sells)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub amount: String,
    #[serde(default)]
    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub direction: Direction,
    pub input_amount: AmountDto,
    pub token_amount: AmountDto,
    /// ETH cost (buy) or return (sell) quoted by the contract
    pub price_amount: Option<AmountDto>,
    /// Max cost (buy) or min return (sell) the trade would be submitted with
    pub slippage_bound: Option<AmountDto>,
    pub executable: bool,
}

impl From<&Quote> for QuoteResponse {
    fn from(quote: &Quote) -> Self {
        let order = TradeOrder::new(
            &quote.token_amount,
            quote.price_amount.as_ref(),
            quote.direction,
        );
        let slippage_bound = order.map(|order| match order {
            TradeOrder::Buy { max_eth_cost, .. } => AmountDto::from(&max_eth_cost),
            TradeOrder::Sell { min_eth_return, .. } => AmountDto::from(&min_eth_return),
        });

        Self {
            direction: quote.direction,
            input_amount: AmountDto::from(&quote.input_amount),
            token_amount: AmountDto::from(&quote.token_amount),
            price_amount: amount(quote.price_amount.as_ref()),
            slippage_bound,
            executable: quote.is_executable(),
        }
    }
}

/// Trade request; quoted afresh before submission
pub type TradeRequest = QuoteRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeResponse {
    /// False when there was nothing to trade
    pub submitted: bool,
    pub execution: TradeExecution,
    /// Block explorer page for the transaction, once it has a hash
    pub explorer_url: Option<String>,
}

impl TradeResponse {
    pub fn new(submitted: bool, execution: TradeExecution, explorer_base: &str) -> Self {
        let explorer_url = execution
            .hash
            .as_ref()
            .map(|hash| hash.explorer_url(explorer_base));
        Self {
            submitted,
            execution,
            explorer_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurvePointDto {
    pub supply: AmountDto,
    pub price: AmountDto,
}

impl From<&CurvePoint> for CurvePointDto {
    fn from(point: &CurvePoint) -> Self {
        Self {
            supply: AmountDto::from(&point.supply),
            price: AmountDto::from(&point.price),
        }
    }
}

/// Price curve samples around the current supply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveResponse {
    pub total_supply: Option<AmountDto>,
    pub points: Vec<CurvePointDto>,
}

/// RPC endpoint status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcStatusResponse {
    pub connected: bool,
    pub url: String,
    pub chain_id: Option<u64>,
    pub expected_chain_id: u64,
    pub block_number: u64,
    pub chain_mismatch: bool,
    pub can_sign: bool,
}

impl RpcStatusResponse {
    pub fn new(url: String, status: Option<&ChainStatus>, expected_chain_id: u64, can_sign: bool) -> Self {
        match status {
            Some(status) => Self {
                connected: status.is_online,
                url,
                chain_id: status.chain_id,
                expected_chain_id: status.expected_chain_id,
                block_number: status.block_number,
                chain_mismatch: status.chain_mismatch(),
                can_sign,
            },
            None => Self {
                connected: false,
                url,
                chain_id: None,
                expected_chain_id,
                block_number: 0,
                chain_mismatch: false,
                can_sign,
            },
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }
}
