//! NTNFT deployment tooling.
//!
//! Adapters that connect the deployment steps from `ntnft-lib` to the outside
//! world:
//!
//! - Hardhat artifact loading
//! - Contract creation through an alloy provider
//! - Source verification through the Etherscan API
//! - The `ntnft` CLI subcommands

pub mod artifacts;
pub mod chain;
pub mod commands;
pub mod etherscan;

pub use artifacts::{Artifact, ArtifactStore, BuildInfo};
pub use chain::AlloyDeployer;
pub use etherscan::EtherscanVerifier;
