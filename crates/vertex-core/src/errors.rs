//! Error types for Vertex

use thiserror::Error;

/// Core errors that can occur in Vertex
#[derive(Debug, Error)]
pub enum Error {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Trade error: {0}")]
    Trade(#[from] TradeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// RPC connection, read and submission errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("RPC endpoint unreachable at {url}")]
    Unreachable { url: String },

    #[error("RPC returned error: {message}")]
    ApiError { message: String },

    #[error("RPC request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Invalid address: {address}")]
    InvalidAddress { address: String },

    #[error("No signing key configured, cannot submit {action}")]
    NoSigner { action: &'static str },

    #[error("Amount out of range for uint256: {value}")]
    AmountOutOfRange { value: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Trade submission and confirmation errors
#[derive(Debug, Error)]
pub enum TradeError {
    #[error("A trade is already in progress")]
    InProgress,

    #[error("Transaction submission failed: {message}")]
    SubmissionFailed { message: String },

    #[error("Transaction {hash} reverted")]
    Reverted { hash: String },

    #[error("Receipt for {hash} not observed within {secs}s")]
    ReceiptTimeout { hash: String, secs: u64 },

    #[error("Receipt lookup failed: {message}")]
    ReceiptFailed { message: String },
}

/// Result type alias for Vertex operations
pub type Result<T> = std::result::Result<T, Error>;

impl LedgerError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "rpc_unreachable",
            Self::ApiError { .. } => "rpc_error",
            Self::Timeout { .. } => "rpc_timeout",
            Self::InvalidAddress { .. } => "invalid_address",
            Self::NoSigner { .. } => "no_signer",
            Self::AmountOutOfRange { .. } => "amount_out_of_range",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAddress { .. } | Self::AmountOutOfRange { .. } => 400,
            Self::NoSigner { .. } => 422,
            Self::Unreachable { .. } | Self::Timeout { .. } => 503,
            Self::ApiError { .. } | Self::InvalidResponse(_) => 502,
        }
    }
}

impl TradeError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InProgress => "trade_in_progress",
            Self::SubmissionFailed { .. } => "submission_failed",
            Self::Reverted { .. } => "reverted",
            Self::ReceiptTimeout { .. } => "receipt_timeout",
            Self::ReceiptFailed { .. } => "receipt_failed",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::InProgress => 409,
            Self::SubmissionFailed { .. } | Self::Reverted { .. } => 422,
            Self::ReceiptTimeout { .. } | Self::ReceiptFailed { .. } => 504,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_codes() {
        let err = LedgerError::NoSigner { action: "buy" };
        assert_eq!(err.error_code(), "no_signer");
        assert_eq!(err.status_code(), 422);

        let err = LedgerError::Timeout { secs: 30 };
        assert_eq!(err.error_code(), "rpc_timeout");
        assert_eq!(err.status_code(), 503);
        assert_eq!(err.to_string(), "RPC request timed out after 30s");
    }

    #[test]
    fn test_trade_error_codes() {
        let err = TradeError::Reverted {
            hash: "0x01".into(),
        };
        assert_eq!(err.error_code(), "reverted");
        assert_eq!(err.status_code(), 422);
        assert_eq!(TradeError::InProgress.status_code(), 409);
    }
}
