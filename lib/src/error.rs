use alloy::primitives::Address;
use thiserror::Error;

/// Failures raised while configuring or running a deployment.
///
/// `ChainNotFound`, `ContractNotFound` and `ArtifactNotFound` are the
/// not-found family; `Network` covers the deployment transaction and its
/// confirmation wait. `Verification` is the only variant the deploy steps
/// swallow.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("no chain configured for chain id {0}")]
    ChainNotFound(u64),

    #[error("no deployment of `{contract}` found on network `{network}`")]
    ContractNotFound { contract: String, network: String },

    #[error("compiled artifact for `{0}` not found")]
    ArtifactNotFound(String),

    #[error("deployment of `{contract}` failed: {reason}")]
    Network { contract: String, reason: String },

    #[error("source verification of {address} failed: {reason}")]
    Verification { address: Address, reason: String },

    #[error("network name `{0}` cannot be used as a deployments directory")]
    InvalidNetworkName(String),

    #[error("deployment store error: {0}")]
    Store(String),
}

impl DeployError {
    /// Shorthand for a failed deployment or confirmation wait.
    pub fn network(contract: &str, reason: impl ToString) -> Self {
        Self::Network {
            contract: contract.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn verification(address: Address, reason: impl ToString) -> Self {
        Self::Verification {
            address,
            reason: reason.to_string(),
        }
    }

    /// True for the not-found family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ChainNotFound(_) | Self::ContractNotFound { .. } | Self::ArtifactNotFound(_)
        )
    }
}

impl From<std::io::Error> for DeployError {
    fn from(err: std::io::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<serde_json::Error> for DeployError {
    fn from(err: serde_json::Error) -> Self {
        Self::Store(err.to_string())
    }
}

pub type Result<T, E = DeployError> = std::result::Result<T, E>;
