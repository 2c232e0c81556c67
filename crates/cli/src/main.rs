//! Wicker CLI - Operational tools for the storefront gateway.
//!
//! # Usage
//!
//! ```bash
//! # Validate environment configuration
//! wicker-cli check-config
//!
//! # Probe the WooCommerce upstream with the configured credentials
//! wicker-cli ping
//!
//! # Prefetch the first pages of products and categories into the cache
//! wicker-cli warm-cache --pages 3
//! ```
//!
//! # Commands
//!
//! - `check-config` - Load and validate the environment configuration
//! - `ping` - Credentialed upstream reachability probe
//! - `warm-cache` - Prefetch catalogue pages through the client

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "wicker-cli")]
#[command(author, version, about = "Wicker CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the environment configuration
    CheckConfig,
    /// Probe the WooCommerce upstream with the configured credentials
    Ping,
    /// Prefetch catalogue pages into the in-memory cache
    WarmCache {
        /// Number of listing pages to prefetch
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::CheckConfig => commands::check::config()?,
        Commands::Ping => commands::probe::ping().await?,
        Commands::WarmCache { pages } => commands::warm::cache(pages).await?,
    }
    Ok(())
}
