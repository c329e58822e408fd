//! Compiled contract artifacts in the Hardhat output layout.
//!
//! ```text
//! artifacts/
//!   build-info/<hash>.json
//!   contracts/Verifier.sol/Verifier.json
//!   contracts/Verifier.sol/Verifier.dbg.json
//! ```

use alloy::primitives::Bytes;
use ntnft_lib::DeployError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const BUILD_INFO_DIR: &str = "build-info";

/// Bytecode and ABI of one compiled contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    /// Source file the contract was compiled from, e.g. `contracts/NTNFT.sol`
    pub source_name: String,
    pub abi: serde_json::Value,
    pub bytecode: Bytes,
    #[serde(skip)]
    path: PathBuf,
}

impl Artifact {
    /// Fully qualified name as explorers expect it.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    build_info: PathBuf,
}

/// Compiler run that produced an artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub solc_long_version: String,
    /// Standard JSON compiler input
    pub input: serde_json::Value,
}

/// Reads artifacts below a root directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the artifact for `contract_name`.
    pub fn load(&self, contract_name: &str) -> Result<Artifact, DeployError> {
        let path = find_file(&self.root, &format!("{contract_name}.json"))
            .ok_or_else(|| DeployError::ArtifactNotFound(contract_name.to_string()))?;
        let content = fs::read_to_string(&path)?;
        let mut artifact: Artifact = serde_json::from_str(&content)?;
        if artifact.bytecode.is_empty() {
            // interfaces and abstract contracts compile to empty bytecode
            return Err(DeployError::ArtifactNotFound(contract_name.to_string()));
        }
        artifact.path = path;
        Ok(artifact)
    }

    /// Load the build info referenced by `artifact`'s debug file.
    pub fn build_info(&self, artifact: &Artifact) -> Result<BuildInfo, DeployError> {
        let dir = artifact.path.parent().unwrap_or(&self.root);
        let dbg_path = dir.join(format!("{}.dbg.json", artifact.contract_name));
        let dbg: DebugFile = serde_json::from_str(&fs::read_to_string(dbg_path)?)?;
        let content = fs::read_to_string(dir.join(dbg.build_info))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Depth-first search for `file_name`, skipping the build-info directory.
fn find_file(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let candidate = dir.join(file_name);
    if candidate.is_file() {
        return Some(candidate);
    }
    let mut subdirs: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_dir() && !path.ends_with(BUILD_INFO_DIR))
        .collect();
    subdirs.sort();
    subdirs.iter().find_map(|sub| find_file(sub, file_name))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Write a minimal Hardhat artifact tree for `name` under `root`.
    pub(crate) fn write_artifact(root: &Path, name: &str, bytecode: &str) {
        let dir = root.join("contracts").join(format!("{name}.sol"));
        fs::create_dir_all(&dir).unwrap();
        fs::create_dir_all(root.join(BUILD_INFO_DIR)).unwrap();

        let artifact = json!({
            "_format": "hh-sol-artifact-1",
            "contractName": name,
            "sourceName": format!("contracts/{name}.sol"),
            "abi": [],
            "bytecode": bytecode,
        });
        fs::write(dir.join(format!("{name}.json")), artifact.to_string()).unwrap();

        let dbg = json!({ "_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/abc.json" });
        fs::write(dir.join(format!("{name}.dbg.json")), dbg.to_string()).unwrap();

        let build_info = json!({
            "solcVersion": "0.8.17",
            "solcLongVersion": "0.8.17+commit.8df45f5f",
            "input": { "language": "Solidity", "sources": {} },
        });
        fs::write(root.join(BUILD_INFO_DIR).join("abc.json"), build_info.to_string()).unwrap();
    }

    #[test]
    fn test_load_nested_artifact() {
        let root = tempfile::tempdir().unwrap();
        write_artifact(root.path(), "Verifier", "0x6080");

        let store = ArtifactStore::new(root.path());
        let artifact = store.load("Verifier").unwrap();
        assert_eq!(artifact.contract_name, "Verifier");
        assert_eq!(artifact.qualified_name(), "contracts/Verifier.sol:Verifier");
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80]);
    }

    #[test]
    fn test_missing_artifact() {
        let root = tempfile::tempdir().unwrap();
        let err = ArtifactStore::new(root.path()).load("NTNFT").unwrap_err();
        assert!(matches!(err, DeployError::ArtifactNotFound(name) if name == "NTNFT"));
    }

    #[test]
    fn test_empty_bytecode_is_not_deployable() {
        let root = tempfile::tempdir().unwrap();
        write_artifact(root.path(), "IVerifier", "0x");
        assert!(ArtifactStore::new(root.path()).load("IVerifier").is_err());
    }

    #[test]
    fn test_build_info_follows_debug_file() {
        let root = tempfile::tempdir().unwrap();
        write_artifact(root.path(), "NTNFT", "0x6080");

        let store = ArtifactStore::new(root.path());
        let artifact = store.load("NTNFT").unwrap();
        let build_info = store.build_info(&artifact).unwrap();
        assert_eq!(build_info.solc_long_version, "0.8.17+commit.8df45f5f");
        assert_eq!(build_info.input["language"], "Solidity");
    }
}
