//! Configuration types for Vertex

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::types::Address;

/// Public Arbitrum Sepolia RPC, used when no endpoint is configured
pub const DEFAULT_RPC_URL: &str = "https://sepolia-rollup.arbitrum.io/rpc";

/// Arbitrum Sepolia chain id
pub const DEFAULT_CHAIN_ID: u64 = 421_614;

pub const DEFAULT_EXPLORER_URL: &str = "https://sepolia.arbiscan.io";

const UNSET_CONTRACT: &str = "0x0000000000000000000000000000000000000000";

/// RPC connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// JSON-RPC URL (e.g., "https://sepolia-rollup.arbitrum.io/rpc")
    pub url: String,

    /// Expected chain id, used for transaction signing
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl RpcConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Quote pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Quiet period before a typed amount is quoted
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl QuoteConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Trade execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeConfig {
    /// Delay between observing a successful receipt and refreshing chain state
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,

    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,

    /// Give up waiting for a receipt after this long
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
}

fn default_refresh_delay_ms() -> u64 {
    1000
}

fn default_receipt_poll_interval_ms() -> u64 {
    2000
}

fn default_receipt_timeout_secs() -> u64 {
    10 * 60
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            refresh_delay_ms: default_refresh_delay_ms(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
            receipt_timeout_secs: default_receipt_timeout_secs(),
        }
    }
}

impl TradeConfig {
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// RPC connection settings
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Bonding curve contract address
    pub contract_address: String,

    /// Account whose token balance is tracked (defaults to the signer's address)
    #[serde(default)]
    pub account: Option<String>,

    /// Block explorer base URL for confirmation links
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,

    #[serde(default)]
    pub quote: QuoteConfig,

    #[serde(default)]
    pub trade: TradeConfig,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Signing key, only ever read from the environment
    #[serde(skip)]
    pub private_key: Option<String>,
}

fn default_explorer_url() -> String {
    DEFAULT_EXPLORER_URL.to_string()
}

fn default_api_port() -> u16 {
    19054
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            contract_address: UNSET_CONTRACT.to_string(),
            account: None,
            explorer_url: default_explorer_url(),
            quote: QuoteConfig::default(),
            trade: TradeConfig::default(),
            api_port: default_api_port(),
            private_key: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional JSON file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                serde_json::from_str(&text).map_err(|e| Error::Serialization(e.to_string()))?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `VERTEX_*` overrides from the given variable lookup.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        match var("VERTEX_RPC_URL").filter(|v| !v.is_empty()) {
            Some(url) => self.rpc.url = url,
            None if self.rpc.url == DEFAULT_RPC_URL => {
                tracing::warn!(
                    "Missing VERTEX_RPC_URL in environment, falling back to public RPC."
                );
            }
            None => {}
        }
        if let Some(contract) = var("VERTEX_CONTRACT").filter(|v| !v.is_empty()) {
            self.contract_address = contract;
        }
        if let Some(account) = var("VERTEX_ACCOUNT").filter(|v| !v.is_empty()) {
            self.account = Some(account);
        }
        if let Some(key) = var("VERTEX_PRIVATE_KEY").filter(|v| !v.is_empty()) {
            self.private_key = Some(key);
        }
    }

    /// Check addresses are well formed and a contract has been configured.
    pub fn validate(&self) -> Result<()> {
        if self.contract_address == UNSET_CONTRACT {
            return Err(Error::Config(
                "contract address not set (use contract_address or VERTEX_CONTRACT)".to_string(),
            ));
        }
        Address::parse(&self.contract_address)?;
        if let Some(account) = &self.account {
            Address::parse(account)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.rpc.url, DEFAULT_RPC_URL);
        assert_eq!(config.rpc.chain_id, 421_614);
        assert_eq!(config.quote.debounce(), Duration::from_millis(200));
        assert_eq!(config.trade.refresh_delay(), Duration::from_millis(1000));
        assert_eq!(config.api_port, 19054);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = AppConfig::default();
        config.private_key = Some("secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));

        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rpc.url, config.rpc.url);
        assert!(parsed.private_key.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{"contract_address":"0x5FbDB2315678afecb367f032d93F642f64180aa3"}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.explorer_url, DEFAULT_EXPLORER_URL);
        assert_eq!(config.trade.receipt_timeout(), Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env(|key| match key {
            "VERTEX_RPC_URL" => Some("http://127.0.0.1:8545".to_string()),
            "VERTEX_CONTRACT" => Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string()),
            "VERTEX_PRIVATE_KEY" => Some("0x01".to_string()),
            _ => None,
        });
        assert_eq!(config.rpc.url, "http://127.0.0.1:8545");
        assert_eq!(config.private_key.as_deref(), Some("0x01"));
        assert!(config.account.is_none());
        assert!(config.validate().is_ok());
    }
}
