//! Elorad CLI - Demo catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Seed 100 demo products into the Medusa backend
//! elorad seed demo
//!
//! # Reproduce an earlier run and preview it without writing
//! elorad seed demo --seed 42 --dry-run
//!
//! # Use a custom plan
//! elorad seed demo --plan seed/demo.yaml --count 20
//! ```
//!
//! # Environment
//!
//! - `MEDUSA_BACKEND_URL` - Medusa backend base URL
//! - `MEDUSA_ADMIN_API_KEY` - Secret Admin API key (not needed for `--dry-run`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod demo;
#[cfg(test)]
mod testing;

use commands::seed::DemoOptions;

#[derive(Parser)]
#[command(name = "elorad")]
#[command(author, version, about = "Elorad CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the Medusa backend
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create a demo catalog with inventory
    Demo {
        /// YAML seed plan (defaults to the bundled plan)
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Number of products to generate (defaults to the plan's count)
        #[arg(long)]
        count: Option<usize>,

        /// RNG seed; the same seed generates the same products
        #[arg(long)]
        seed: Option<u64>,

        /// Print what would be created without writing
        #[arg(long)]
        dry_run: bool,
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
        Commands::Seed { target } => match target {
            SeedTarget::Demo {
                plan,
                count,
                seed,
                dry_run,
            } => {
                let summary = commands::seed::demo(DemoOptions {
                    plan,
                    count,
                    seed,
                    dry_run,
                })
                .await?;
                tracing::info!(
                    "Seed {}: {} generated, {} skipped, {} created, {} inventory levels",
                    summary.seed,
                    summary.generated,
                    summary.skipped,
                    summary.created,
                    summary.inventory_levels
                );
            }
        },
    }
    Ok(())
}
