//! Binary crate for the weather gateway server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Wiring configuration into the HTTP layer
//! - Serving the JSON and CSV export endpoints

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod api;
mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
