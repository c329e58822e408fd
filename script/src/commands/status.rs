use alloy::{
    network::TransactionBuilder,
    primitives::Address,
    providers::{Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
};
use crate::commands::Outcome;
use alloy_sol_types::SolCall;
use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use ntnft_lib::config::{chain_config_or, ChainConfig};
use ntnft_lib::{
    DeployError, DeploymentStore, FileDeploymentStore, NetworkContext, INTNFT, NFT_CONTRACT,
    VERIFIER_CONTRACT,
};
use std::path::PathBuf;

/// Show the stored deployments and the NTNFT's on-chain state
#[derive(Args, Debug)]
pub struct StatusCommand {
    /// RPC provider URL
    #[arg(long, short = 'r', env = "RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: String,

    /// Network name, required when the chain id is not configured
    #[arg(long, short = 'n')]
    pub network: Option<String>,

    /// Where deployment records are kept, one directory per network
    #[arg(long, default_value = "deployments")]
    pub deployments_dir: PathBuf,

    /// Also report whether this account has minted
    #[arg(long, short = 'a')]
    pub account: Option<Address>,
}

/// Shown for chains missing from the network table.
const UNCONFIGURED_CHAIN: ChainConfig = ChainConfig {
    name: "unconfigured",
    call_back_gas_limit: "n/a",
};

/// `eth_call` a view function and decode its return value.
async fn call_view<P: Provider, C: SolCall>(
    provider: &P,
    to: Address,
    call: C,
) -> Result<C::Return> {
    let tx = TransactionRequest::default()
        .with_to(to)
        .with_input(call.abi_encode());
    let output = provider.call(tx).await?;
    Ok(C::abi_decode_returns(&output)?)
}

impl StatusCommand {
    pub async fn execute(&self) -> Result<Outcome> {
        let provider = ProviderBuilder::new()
            .connect(&self.rpc_url)
            .await
            .with_context(|| format!("could not connect to {}", self.rpc_url))?;
        let chain_id = provider.get_chain_id().await?;
        let network = NetworkContext::resolve(chain_id, self.network.clone(), None, None)?;
        let store = FileDeploymentStore::new(&self.deployments_dir, &network.name)?;

        println!(
            "{} {}",
            "📊 NTNFT status on".bright_blue().bold(),
            network.name.bright_cyan().bold()
        );
        println!("{}", "─".repeat(50).bright_black());
        let chain = chain_config_or(chain_id, &UNCONFIGURED_CHAIN);
        println!(
            "{} {} ({})",
            "Chain:".bright_white(),
            chain_id,
            chain.name.bright_black()
        );
        println!(
            "{} {}",
            "Callback gas limit:".bright_white(),
            chain.call_back_gas_limit
        );

        let mut nft_address = None;
        for name in [VERIFIER_CONTRACT, NFT_CONTRACT] {
            match store.get(name)? {
                Some(record) => {
                    println!(
                        "{} {}",
                        format!("{name}:").bright_white(),
                        record.address.to_string().bright_cyan()
                    );
                    if name == NFT_CONTRACT {
                        nft_address = Some(record.address);
                    }
                }
                None => println!(
                    "{} {}",
                    format!("{name}:").bright_white(),
                    "not deployed".bright_black()
                ),
            }
        }

        let nft_address = nft_address.ok_or_else(|| DeployError::ContractNotFound {
            contract: NFT_CONTRACT.to_string(),
            network: network.name.clone(),
        })?;

        let counter =
            call_view(&provider, nft_address, INTNFT::getTokenCounterCall {}).await?;
        println!("{} {}", "Tokens minted:".bright_white(), counter);

        if let Some(account) = self.account {
            let minted =
                call_view(&provider, nft_address, INTNFT::hasMintedCall { account }).await?;
            println!(
                "{} {}",
                format!("{account} has minted:").bright_white(),
                if minted { "yes".bright_green() } else { "no".bright_yellow() }
            );
        }

        Ok(Outcome::Completed)
    }
}
