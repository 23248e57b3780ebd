//! Command-line interface for managing Purse-enabled wallets.
//!
//! The binary is a thin consumer of `purse-sdk`; all wallet logic lives
//! there. Connection and signing material come from the environment:
//!
//! - `PURSE_RPC_URL` - RPC endpoint (default: `http://localhost:8545`)
//! - `PURSE_PRIVATE_KEY` - account key, required by `enable` and `disable`
//! - `PURSE_DEPLOYMENTS` - path to a JSON deployment registry overriding
//!   the bundled one

mod commands;
mod config;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "purse", version, about = "Commands for managing a Purse-enabled wallet")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check if ADDRESS has the Purse delegate enabled, then check the
    /// version of its accessories
    Check {
        /// Account address to inspect
        address: String,
    },
    /// Enable Purse with one or more accessories added
    Enable {
        /// Accessory references, e.g. `Multicall` or `Flashloan@0`
        accessories: Vec<String>,
    },
    /// Remove Purse from your account
    Disable,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Check { address } => commands::check(&config, &address).await,
        Command::Enable { accessories } => commands::enable(&config, &accessories).await,
        Command::Disable => commands::disable(&config).await,
    }
}
