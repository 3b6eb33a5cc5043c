//! Vertex command-line application
//!
//! `vertex serve` runs the HTTP API; `vertex interactive` quotes and trades
//! from the terminal.

pub mod cli;
pub mod interactive;

use std::sync::Arc;

use anyhow::Context;
use evm_client::EvmClient;
use tracing_subscriber::EnvFilter;
use vertex_api::AppState;
use vertex_core::AppConfig;

pub use cli::{Cli, Command};

/// Install the global tracing subscriber
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("vertex=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();
    Ok(())
}

/// Run the selected command to completion
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!("Starting Vertex client v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let client = EvmClient::new(&config)
        .await
        .with_context(|| format!("failed to create RPC client for {}", config.rpc.url))?;

    match client.status().await {
        Some(status) if status.chain_mismatch() => tracing::warn!(
            "RPC endpoint reports chain {:?}, expected {}",
            status.chain_id,
            status.expected_chain_id
        ),
        Some(status) if !status.is_online => {
            tracing::warn!("RPC endpoint {} is not responding", config.rpc.url)
        }
        _ => {}
    }
    if !client.can_sign() {
        tracing::info!("No signing key configured; trading is disabled");
    }

    match cli.command {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.api_port);
            let state = AppState::with_rpc(config, client);
            state.engine().refetch_all().await;
            vertex_api::start_server(state, port, shutdown_signal())
                .await
                .context("API server failed")?;
        }
        Command::Interactive => {
            let account = client.account().cloned();
            interactive::run(&config, Arc::new(client), account).await?;
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
