//! AutoProbe - autonomous exploration of interactive UI prototypes
//!
//! Main entry point for the AutoProbe CLI and control surface.

mod adapters;
mod cli;
mod server;

use clap::Parser;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    server::init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Explore(args) => server::run_explore(&cli.config, args).await,
        Commands::Serve { host, port } => server::run_server(&cli.config, host, port).await,
    }
}
