//! NTNFT CLI - deploys the proof-gated NFT contract pair
//!
//! Usage:
//! ```shell
//! # Deploy Verifier, then NTNFT wired to it
//! cargo run --bin ntnft -- deploy --rpc-url $RPC_URL --private-key $PRIVATE_KEY
//!
//! # Redeploy only the NFT against the stored verifier
//! cargo run --bin ntnft -- deploy --step nft --network goerli
//!
//! # Inspect a deployment
//! cargo run --bin ntnft -- status --account 0x...
//! ```

use clap::{Parser, Subcommand};
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

use ntnft_script::commands::{error_hint, DeployCommand, NetworksCommand, StatusCommand};

#[derive(Parser)]
#[command(
    name = "ntnft",
    about = "🪪 NTNFT - deploy the zero-knowledge gated NFT",
    long_about = "Deploys the Verifier contract and the NTNFT contract that checks proofs against it.\n\nFeatures:\n• Ordered Verifier -> NTNFT deployment\n• Deployment records per network\n• Etherscan source verification on live networks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 🚀 Deploy the Verifier and NTNFT contracts
    Deploy(DeployCommand),
    /// 🌐 List the configured networks
    Networks(NetworksCommand),
    /// 📊 Show deployed addresses and mint counts
    Status(StatusCommand),
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    // Initialize rustls crypto provider
    use rustls::crypto::ring::default_provider;
    use rustls::crypto::CryptoProvider;
    if CryptoProvider::install_default(default_provider()).is_err() {
        tracing::debug!("crypto provider already installed");
    }

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Deploy(cmd) => cmd.execute().await,
        Commands::Networks(cmd) => cmd.execute(),
        Commands::Status(cmd) => cmd.execute().await,
    };

    match result {
        Ok(outcome) => {
            if let Some(banner) = outcome.banner() {
                println!();
                println!("{} {}", "✨".bright_green(), banner.bright_green().bold());
            }
        }
        Err(e) => {
            println!();
            eprintln!(
                "{} {}",
                "💥".bright_red(),
                "Operation failed!".bright_red().bold()
            );
            eprintln!(
                "{} {}",
                "📋".bright_yellow(),
                "Error details:".bright_yellow()
            );
            eprintln!("   {}", format!("{e:#}").bright_red());
            println!();
            eprintln!("{} {}", "💡".bright_blue(), "Tips:".bright_blue().bold());
            if let Some(hint) = error_hint(&e) {
                eprintln!("   • {hint}");
            }
            eprintln!("   • Check your private key format (should start with 0x)");
            eprintln!("   • Ensure your RPC provider is accessible");
            eprintln!("   • Compile the contracts so the artifacts directory exists");
            eprintln!("   • Pass --network when deploying to an unconfigured chain");
            eprintln!("   • Run with --verbose for detailed logs");

            process::exit(1);
        }
    }
}
