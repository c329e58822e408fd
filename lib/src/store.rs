//! Where deployment records live between steps.
//!
//! The NFT step finds the verifier through the store, so anything that can
//! hand back a record by contract name works: a per-process map for tests and
//! throwaway chains, or one JSON file per contract under a network directory.

use crate::error::{DeployError, Result};
use crate::record::DeploymentRecord;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Deployment records keyed by contract name.
pub trait DeploymentStore {
    /// The record for `contract_name`, or `None` when it was never deployed.
    fn get(&self, contract_name: &str) -> Result<Option<DeploymentRecord>>;

    /// Save `record`, replacing any earlier deployment of the same contract.
    fn save(&mut self, record: &DeploymentRecord) -> Result<()>;
}

/// Records kept for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryDeploymentStore {
    records: HashMap<String, DeploymentRecord>,
}

impl MemoryDeploymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DeploymentStore for MemoryDeploymentStore {
    fn get(&self, contract_name: &str) -> Result<Option<DeploymentRecord>> {
        Ok(self.records.get(contract_name).cloned())
    }

    fn save(&mut self, record: &DeploymentRecord) -> Result<()> {
        self.records
            .insert(record.contract_name.clone(), record.clone());
        Ok(())
    }
}

/// Records persisted as `<root>/<network>/<ContractName>.json`.
#[derive(Debug, Clone)]
pub struct FileDeploymentStore {
    dir: PathBuf,
}

/// A network name must be a single plain path component.
fn is_valid_network_name(network: &str) -> bool {
    !network.is_empty()
        && network != "."
        && network != ".."
        && !network.contains(['/', '\\'])
        && Path::new(network).components().count() == 1
}

impl FileDeploymentStore {
    /// Store for `network` below `root`. Names that would leave `root` are
    /// rejected.
    pub fn new(root: impl AsRef<Path>, network: &str) -> Result<Self> {
        if !is_valid_network_name(network) {
            return Err(DeployError::InvalidNetworkName(network.to_string()));
        }
        Ok(Self {
            dir: root.as_ref().join(network),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, contract_name: &str) -> PathBuf {
        self.dir.join(format!("{contract_name}.json"))
    }
}

impl DeploymentStore for FileDeploymentStore {
    fn get(&self, contract_name: &str) -> Result<Option<DeploymentRecord>> {
        let path = self.record_path(contract_name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&mut self, record: &DeploymentRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut file = fs::File::create(self.record_path(&record.contract_name))?;
        let json_data = serde_json::to_string_pretty(record)?;
        file.write_all(json_data.as_bytes())?;
        tracing::debug!(
            "saved {} deployment to {}",
            record.contract_name,
            self.dir.display()
        );
        Ok(())
    }
}
