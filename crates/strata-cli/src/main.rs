//! strata CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use strata_cli::{Cli, Commands, DaemonClient, cmd};

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so they never interleave with progress output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = DaemonClient::new(&cli.host)?;

    match cli.command {
        Commands::Pull { image, missing } => cmd::pull::pull(&client, &image, missing).await,
        Commands::Push { image } => cmd::push::push(&client, &image).await,
    }
}
