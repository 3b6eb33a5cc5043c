//! Application state shared across API handlers

use std::sync::Arc;

use evm_client::EvmClient;
use vertex::{LogNotifier, QuoteEngine, TradeCoordinator};
use vertex_core::{Address, AppConfig, CurveLedger};

/// Quote engine over any ledger implementation
pub type Engine = QuoteEngine<dyn CurveLedger>;

/// Trade coordinator that reports outcomes to the log
pub type Coordinator = TradeCoordinator<dyn CurveLedger, LogNotifier>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    engine: Arc<Engine>,
    coordinator: Arc<Coordinator>,
    rpc: Option<EvmClient>,
}

impl AppState {
    /// Build state over an arbitrary ledger, tracking `account`'s balance
    pub fn new(config: AppConfig, ledger: Arc<dyn CurveLedger>, account: Option<Address>) -> Self {
        Self::build(config, ledger, account, None)
    }

    /// Build state over a JSON-RPC client
    pub fn with_rpc(config: AppConfig, client: EvmClient) -> Self {
        let account = client.account().cloned();
        let ledger: Arc<dyn CurveLedger> = Arc::new(client.clone());
        Self::build(config, ledger, account, Some(client))
    }

    fn build(
        config: AppConfig,
        ledger: Arc<dyn CurveLedger>,
        account: Option<Address>,
        rpc: Option<EvmClient>,
    ) -> Self {
        let engine = Arc::new(QuoteEngine::new(ledger, account));
        let coordinator = Arc::new(TradeCoordinator::new(
            engine.clone(),
            Arc::new(LogNotifier),
            config.trade.clone(),
            config.explorer_url.clone(),
        ));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                engine,
                coordinator,
                rpc,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.inner.engine
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.inner.coordinator
    }

    /// JSON-RPC client, when the ledger is a live chain
    pub fn rpc(&self) -> Option<&EvmClient> {
        self.inner.rpc.as_ref()
    }
}
