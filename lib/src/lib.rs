//! Deployment of the proof-gated NTNFT contract pair.
//!
//! - `config`: known chains and the development chain set
//! - `record`: constructor arguments and deployment records
//! - `store`: lookup of earlier deployments by contract name
//! - `deploy`: the verifier and NFT deployment steps

use alloy_sol_types::sol;
pub mod config;
pub mod deploy;
pub mod error;
pub mod record;
pub mod store;

sol! {
    /// Read-only view of a deployed NTNFT.
    interface INTNFT {
        function getTokenCounter() external view returns (uint256);
        function hasMinted(address account) external view returns (bool);
        function tokenURI(uint256 tokenId) external view returns (string);
    }
}

pub use config::{chain_config, is_development_chain, ChainConfig, NetworkContext};
pub use deploy::{
    ContractDeployer, DeployStep, Deployment, SourceVerifier, NFT_CONTRACT, VERIFIER_CONTRACT,
};
pub use error::DeployError;
pub use record::{encode_constructor_args, ConstructorArg, DeploymentRecord};
pub use store::{DeploymentStore, FileDeploymentStore, MemoryDeploymentStore};
