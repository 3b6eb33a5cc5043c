use clap::Parser;

use vertex_app::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    vertex_app::init_tracing()?;
    vertex_app::run(cli).await
}
