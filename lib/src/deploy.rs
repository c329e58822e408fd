//! The deployment steps.
//!
//! Both steps are generic over their collaborators so they run the same
//! against a live chain and against the fakes in the tests below. The only
//! ordering rule is that the NFT step needs the verifier's address, which it
//! reads back from the [`DeploymentStore`].

use crate::config::NetworkContext;
use crate::error::{DeployError, Result};
use crate::record::{ConstructorArg, DeploymentRecord};
use crate::store::DeploymentStore;
use alloy::primitives::Address;
use tracing::{info, warn};

pub const VERIFIER_CONTRACT: &str = "Verifier";
pub const NFT_CONTRACT: &str = "NTNFT";

/// Sends a contract creation and waits for it to be confirmed.
#[allow(async_fn_in_trait)]
pub trait ContractDeployer {
    /// Deploy `contract_name` from `from` with `args`, blocking until
    /// `confirmations` blocks have been observed.
    async fn deploy(
        &self,
        contract_name: &str,
        from: Address,
        args: &[ConstructorArg],
        confirmations: u64,
    ) -> Result<DeploymentRecord>;
}

/// Registers deployed source with a block explorer.
#[allow(async_fn_in_trait)]
pub trait SourceVerifier {
    async fn verify(&self, record: &DeploymentRecord) -> Result<()>;
}

/// `None` skips verification entirely.
impl<V: SourceVerifier> SourceVerifier for Option<V> {
    async fn verify(&self, record: &DeploymentRecord) -> Result<()> {
        match self {
            Some(verifier) => verifier.verify(record).await,
            None => {
                tracing::debug!("no explorer configured, skipping {}", record.contract_name);
                Ok(())
            }
        }
    }
}

/// One deploy script, run in [`DeployStep::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeployStep {
    Verifier,
    Nft,
}

impl DeployStep {
    pub const ALL: [DeployStep; 2] = [DeployStep::Verifier, DeployStep::Nft];

    pub fn contract_name(&self) -> &'static str {
        match self {
            Self::Verifier => VERIFIER_CONTRACT,
            Self::Nft => NFT_CONTRACT,
        }
    }
}

/// Everything a deployment run needs.
#[derive(Debug)]
pub struct Deployment<D, V, S> {
    pub deployer: D,
    pub verifier: V,
    pub store: S,
    /// Account paying for and owning the deployments
    pub from: Address,
    pub network: NetworkContext,
}

impl<D, V, S> Deployment<D, V, S>
where
    D: ContractDeployer,
    V: SourceVerifier,
    S: DeploymentStore,
{
    pub fn new(deployer: D, verifier: V, store: S, from: Address, network: NetworkContext) -> Self {
        Self {
            deployer,
            verifier,
            store,
            from,
            network,
        }
    }

    /// Deploy the proof verifier. It takes no constructor arguments.
    pub async fn deploy_verifier(&mut self) -> Result<DeploymentRecord> {
        info!("Deploying {VERIFIER_CONTRACT}...");
        self.deploy_and_verify(VERIFIER_CONTRACT, Vec::new()).await
    }

    /// Deploy the NFT, wired to the previously deployed verifier.
    pub async fn deploy_nft(&mut self) -> Result<DeploymentRecord> {
        info!("Deploying {NFT_CONTRACT}...");
        let verifier = self.deployed(VERIFIER_CONTRACT)?;
        let args = vec![ConstructorArg::Address(verifier.address)];
        self.deploy_and_verify(NFT_CONTRACT, args).await
    }

    /// Run `steps` in their fixed order, regardless of the order given.
    pub async fn run(&mut self, steps: &[DeployStep]) -> Result<Vec<DeploymentRecord>> {
        let mut records = Vec::with_capacity(steps.len());
        for step in DeployStep::ALL.into_iter().filter(|step| steps.contains(step)) {
            let record = match step {
                DeployStep::Verifier => self.deploy_verifier().await?,
                DeployStep::Nft => self.deploy_nft().await?,
            };
            records.push(record);
        }
        Ok(records)
    }

    /// The stored deployment of `contract_name` on this network.
    pub fn deployed(&self, contract_name: &str) -> Result<DeploymentRecord> {
        self.store
            .get(contract_name)?
            .ok_or_else(|| DeployError::ContractNotFound {
                contract: contract_name.to_string(),
                network: self.network.name.clone(),
            })
    }

    async fn deploy_and_verify(
        &mut self,
        contract_name: &str,
        args: Vec<ConstructorArg>,
    ) -> Result<DeploymentRecord> {
        info!("------------------------");
        let record = self
            .deployer
            .deploy(contract_name, self.from, &args, self.network.block_confirmations)
            .await?;
        self.store.save(&record)?;
        info!("{contract_name} deployed at {}", record.address);

        if self.network.should_verify() {
            info!("Verifying...");
            // the contract is live either way
            if let Err(err) = self.verifier.verify(&record).await {
                warn!("{err}");
            }
        }

        info!("------------------------");
        Ok(record)
    }
}
