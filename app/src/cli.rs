//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "vertex", author, version, about = "Vertex bonding curve client", long_about = None)]
pub struct Cli {
    /// JSON configuration file; environment variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the HTTP API
    Serve {
        /// Listen port (defaults to the configured API port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Quote and trade from the terminal
    Interactive,
}
