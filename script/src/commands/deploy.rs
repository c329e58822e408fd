use crate::artifacts::ArtifactStore;
use crate::chain::AlloyDeployer;
use crate::commands::{expand_env_vars, redact, Outcome};
use crate::etherscan::EtherscanVerifier;
use alloy::{
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use colored::*;
use dialoguer::{Confirm, Password};
use ntnft_lib::{DeployStep, Deployment, FileDeploymentStore, NetworkContext};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StepArg {
    /// The proof verifier
    Verifier,
    /// The NTNFT, wired to the stored verifier
    Nft,
}

impl From<StepArg> for DeployStep {
    fn from(step: StepArg) -> Self {
        match step {
            StepArg::Verifier => DeployStep::Verifier,
            StepArg::Nft => DeployStep::Nft,
        }
    }
}

/// Deploy the Verifier and NTNFT contracts
#[derive(Args, Debug)]
pub struct DeployCommand {
    /// RPC provider URL
    #[arg(long, short = 'r', env = "RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: String,

    /// Deployer private key (will prompt if not provided)
    #[arg(long, short = 'p', env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Network name, required when the chain id is not configured
    #[arg(long, short = 'n')]
    pub network: Option<String>,

    /// Confirmations to wait for after each deployment
    #[arg(long, short = 'c', env = "BLOCK_CONFIRMATIONS")]
    pub block_confirmations: Option<u64>,

    /// Explorer API key; verification is skipped without it
    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    pub etherscan_api_key: Option<String>,

    /// Compiled contract artifacts
    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Where deployment records are kept, one directory per network
    #[arg(long, default_value = "deployments")]
    pub deployments_dir: PathBuf,

    /// Only run these steps (default: all, verifier first)
    #[arg(long = "step", value_enum)]
    pub steps: Vec<StepArg>,

    /// Skip confirmation prompts
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl DeployCommand {
    fn steps(&self) -> Vec<DeployStep> {
        if self.steps.is_empty() {
            DeployStep::ALL.to_vec()
        } else {
            self.steps.iter().copied().map(DeployStep::from).collect()
        }
    }

    fn private_key(&self) -> Result<String> {
        let raw = match &self.private_key {
            Some(key) => key.clone(),
            None => {
                println!(
                    "{} {}",
                    "🔐".bright_blue(),
                    "Private key required for deployment".bright_cyan()
                );
                Password::new()
                    .with_prompt("Enter the deployer private key")
                    .interact()?
            }
        };
        let key = expand_env_vars(raw.trim())?;
        if key.is_empty() {
            bail!("Private key must not be empty");
        }
        Ok(key)
    }

    pub async fn execute(&self) -> Result<Outcome> {
        println!("{}", "🚀 NTNFT - Deploy".bright_green().bold());
        println!("{}", "═".repeat(50).bright_black());
        println!();

        let private_key = self.private_key()?;
        let signer: PrivateKeySigner = private_key
            .parse()
            .context("Private key must be a 32 byte hex string")?;
        let from = signer.address();

        let provider = ProviderBuilder::new()
            .wallet(signer)
            .connect(&self.rpc_url)
            .await
            .with_context(|| format!("could not connect to {}", self.rpc_url))?;
        let chain_id = provider.get_chain_id().await?;
        debug!("connected to chain {chain_id}");

        let network = NetworkContext::resolve(
            chain_id,
            self.network.clone(),
            self.block_confirmations,
            self.etherscan_api_key.clone(),
        )?;

        println!("{}", "📋 Deployment Details".bright_green().bold());
        println!("{}", "─".repeat(30).bright_black());
        println!(
            "{} {} ({})",
            "Network:".bright_white(),
            network.name.bright_cyan(),
            chain_id
        );
        println!("{} {}", "Provider:".bright_white(), self.rpc_url.bright_cyan());
        println!(
            "{} {} ({})",
            "Deployer:".bright_white(),
            from,
            redact(&private_key).bright_yellow()
        );
        println!(
            "{} {}",
            "Confirmations:".bright_white(),
            network.block_confirmations
        );
        println!(
            "{} {}",
            "Explorer verification:".bright_white(),
            if network.should_verify() {
                "enabled".bright_green()
            } else {
                "skipped".bright_black()
            }
        );
        println!();

        if !network.is_development() && !self.yes {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "{} Deploy to {}?",
                    "⚠️".bright_yellow(),
                    network.name.bright_red().bold()
                ))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("{} Operation cancelled by user", "🚫".bright_red());
                return Ok(Outcome::Cancelled);
            }
        }

        let artifacts = ArtifactStore::new(&self.artifacts_dir);
        let verifier = network
            .explorer_api_key
            .clone()
            .map(|key| EtherscanVerifier::new(key, chain_id, artifacts.clone()));
        let store = FileDeploymentStore::new(&self.deployments_dir, &network.name)?;

        let mut deployment = Deployment::new(
            AlloyDeployer::new(provider, artifacts),
            verifier,
            store,
            from,
            network,
        );
        let records = deployment.run(&self.steps()).await?;

        println!();
        println!("{}", "📦 Deployed Contracts".bright_green().bold());
        println!("{}", "─".repeat(30).bright_black());
        for record in &records {
            println!(
                "{} {}",
                format!("{}:", record.contract_name).bright_white(),
                record.address.to_string().bright_cyan()
            );
            if let Some(tx_hash) = record.transaction_hash {
                println!("   {} {}", "tx".bright_black(), tx_hash);
            }
        }

        Ok(Outcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        deploy: DeployCommand,
    }

    #[test]
    fn test_default_steps_run_everything() {
        let cli = Cli::parse_from(["ntnft", "--private-key", "0x01"]);
        assert_eq!(cli.deploy.steps(), DeployStep::ALL.to_vec());
        assert_eq!(cli.deploy.artifacts_dir, PathBuf::from("artifacts"));
    }

    #[test]
    fn test_selected_steps() {
        let cli = Cli::parse_from(["ntnft", "--step", "nft", "--network", "goerli", "-c", "6"]);
        assert_eq!(cli.deploy.steps(), vec![DeployStep::Nft]);
        assert_eq!(cli.deploy.network.as_deref(), Some("goerli"));
        assert_eq!(cli.deploy.block_confirmations, Some(6));
    }

    #[test]
    fn test_private_key_from_argument() {
        let cli = Cli::parse_from(["ntnft", "--private-key", " 0xabc "]);
        assert_eq!(cli.deploy.private_key().unwrap(), "0xabc");
    }
}
