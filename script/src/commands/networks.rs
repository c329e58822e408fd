use clap::Args;
use crate::commands::Outcome;
use colored::*;
use ntnft_lib::config::{DEFAULT_BLOCK_CONFIRMATIONS, DEVELOPMENT_CHAINS, NETWORK_CONFIG};

/// List the configured chains
#[derive(Args, Debug)]
pub struct NetworksCommand {}

impl NetworksCommand {
    pub fn execute(&self) -> anyhow::Result<Outcome> {
        println!("{}", "🌐 Configured networks".bright_blue().bold());
        println!("{}", "─".repeat(50).bright_black());
        println!(
            "{:<10} {:<12} {:<14} {}",
            "chain id".bright_white(),
            "name".bright_white(),
            "callback gas".bright_white(),
            "development".bright_white()
        );
        for (chain_id, config) in NETWORK_CONFIG {
            let dev = if ntnft_lib::is_development_chain(config.name) {
                "yes".bright_green()
            } else {
                "no".bright_yellow()
            };
            println!(
                "{:<10} {:<12} {:<14} {}",
                chain_id, config.name, config.call_back_gas_limit, dev
            );
        }
        println!();
        println!(
            "{} {}",
            "Development chains:".bright_white(),
            DEVELOPMENT_CHAINS.join(", ").bright_cyan()
        );
        println!(
            "{} {}",
            "Default confirmations:".bright_white(),
            DEFAULT_BLOCK_CONFIRMATIONS
        );
        Ok(Outcome::Completed)
    }
}
