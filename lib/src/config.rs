//! Static network configuration.
//!
//! The chain table and the development chain set are fixed at compile time.
//! Everything that varies per run (RPC endpoint, confirmations, explorer
//! credential) is collected into a [`NetworkContext`] by the caller and passed
//! to the deployment steps explicitly.

use crate::error::{DeployError, Result};

/// Confirmations waited for when the network does not override it.
pub const DEFAULT_BLOCK_CONFIRMATIONS: u64 = 1;

/// Metadata recorded for a known chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConfig {
    /// Network name as used by the deployment store and the dev-chain check
    pub name: &'static str,
    /// Gas limit handed to callback consumers, string-encoded
    pub call_back_gas_limit: &'static str,
}

/// Known chains, keyed by chain id.
pub const NETWORK_CONFIG: &[(u64, ChainConfig)] = &[
    (
        5,
        ChainConfig {
            name: "goerli",
            call_back_gas_limit: "500000",
        },
    ),
    (
        31337,
        ChainConfig {
            name: "hardhat",
            call_back_gas_limit: "500000",
        },
    ),
];

/// Networks where explorer source verification is skipped.
pub const DEVELOPMENT_CHAINS: &[&str] = &["hardhat", "localhost"];

/// Look up a configured chain.
pub fn chain_config(chain_id: u64) -> Result<&'static ChainConfig> {
    NETWORK_CONFIG
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, config)| config)
        .ok_or(DeployError::ChainNotFound(chain_id))
}

/// Look up a configured chain, falling back to `default` when unknown.
pub fn chain_config_or(chain_id: u64, default: &ChainConfig) -> ChainConfig {
    chain_config(chain_id).copied().unwrap_or(*default)
}

/// Exact, case-sensitive membership in [`DEVELOPMENT_CHAINS`].
pub fn is_development_chain(name: &str) -> bool {
    DEVELOPMENT_CHAINS.contains(&name)
}

/// The active network as seen by the deployment steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkContext {
    pub name: String,
    pub chain_id: u64,
    pub block_confirmations: u64,
    pub explorer_api_key: Option<String>,
}

impl NetworkContext {
    pub fn new(name: impl Into<String>, chain_id: u64) -> Self {
        Self {
            name: name.into(),
            chain_id,
            block_confirmations: DEFAULT_BLOCK_CONFIRMATIONS,
            explorer_api_key: None,
        }
    }

    /// Build the context for `chain_id`.
    ///
    /// The network name is `name_override` when given, otherwise the name
    /// configured for the chain id. An unconfigured chain without an override
    /// is a [`DeployError::ChainNotFound`].
    pub fn resolve(
        chain_id: u64,
        name_override: Option<String>,
        block_confirmations: Option<u64>,
        explorer_api_key: Option<String>,
    ) -> Result<Self> {
        let name = match name_override {
            Some(name) => name,
            None => chain_config(chain_id)?.name.to_string(),
        };

        Ok(Self::new(name, chain_id)
            .with_block_confirmations(block_confirmations)
            .with_explorer_api_key(explorer_api_key))
    }

    /// `None` and `Some(0)` both keep [`DEFAULT_BLOCK_CONFIRMATIONS`].
    pub fn with_block_confirmations(mut self, confirmations: Option<u64>) -> Self {
        self.block_confirmations = confirmations
            .filter(|confirmations| *confirmations > 0)
            .unwrap_or(DEFAULT_BLOCK_CONFIRMATIONS);
        self
    }

    /// An empty key is treated the same as a missing one.
    pub fn with_explorer_api_key(mut self, key: Option<String>) -> Self {
        self.explorer_api_key = key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn is_development(&self) -> bool {
        is_development_chain(&self.name)
    }

    /// Whether deployed contracts should be submitted for explorer verification.
    pub fn should_verify(&self) -> bool {
        !self.is_development() && self.explorer_api_key.is_some()
    }
}
