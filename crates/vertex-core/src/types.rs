//! Core type definitions for Vertex

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::LedgerError;

/// Amount in the smallest unit (18-decimal fixed point), used for both ETH and VTX.
pub type Wei = BigInt;

/// Transaction hash (32 bytes, `0x`-prefixed hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Explorer link for this transaction: `<explorer-base>/tx/<hash>`
    pub fn explorer_url(&self, explorer_base: &str) -> String {
        format!("{}/tx/{}", explorer_base.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// EVM account or contract address (20 bytes, `0x`-prefixed hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Parse and validate a `0x`-prefixed 20-byte hex address.
    pub fn parse(addr: &str) -> Result<Self, LedgerError> {
        let digits = addr
            .strip_prefix("0x")
            .or_else(|| addr.strip_prefix("0X"))
            .ok_or_else(|| LedgerError::InvalidAddress {
                address: addr.to_string(),
            })?;

        match hex::decode(digits) {
            Ok(bytes) if bytes.len() == 20 => Ok(Self(addr.to_string())),
            _ => Err(LedgerError::InvalidAddress {
                address: addr.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trade direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Buy,
    Sell,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Constants
pub mod constants {
    /// Decimals of both ETH and the curve token
    pub const TOKEN_DECIMALS: u32 = 18;

    /// Display symbol of the curve token
    pub const TOKEN_SYMBOL: &str = "VTX";
}
