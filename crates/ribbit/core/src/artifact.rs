//! Foundry build artifact resolution.
//!
//! The deployer consumes artifacts produced by `forge build`: for a named
//! contract this module probes the conventional artifact locations under the
//! build output directory and extracts the ABI and creation bytecode needed
//! to submit a deployment transaction.

use alloy_json_abi::JsonAbi;
use alloy_primitives::Bytes;
use ribbit_common::Contract;
use serde::Deserialize;
use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

/// Directory `forge build` writes artifacts to, relative to the project root.
pub const DEFAULT_OUT_DIR: &str = "out";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("no artifact found for contract {contract}; probed: {}", .probed.join(", "))]
    NotFound {
        contract: String,
        probed: Vec<String>,
    },
    #[error("failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("artifact for {0} contains unlinked library placeholders")]
    Unlinked(String),
    #[error("artifact for {0} has no creation bytecode")]
    EmptyBytecode(String),
    #[error("artifact for {contract} has malformed bytecode: {}", .source)]
    InvalidHex {
        contract: String,
        source: hex::FromHexError,
    },
}

/// Wire format of a Foundry artifact, reduced to the fields the deployer
/// consumes.
#[derive(Debug, Deserialize)]
struct RawArtifact {
    abi: JsonAbi,
    bytecode: RawBytecode,
}

#[derive(Debug, Deserialize)]
struct RawBytecode {
    object: String,
}

/// A compiled contract, ready to be turned into a deployment transaction.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Resolves the artifact for `contract` under `out_dir`, probing the
    /// candidate paths most specific first.
    pub fn resolve(out_dir: &Path, contract: &Contract) -> Result<Self, ArtifactError> {
        let probed = contract.artifact_paths();
        for candidate in &probed {
            let path = out_dir.join(candidate);
            if path.is_file() {
                return Self::from_file(&path, contract.contract_name());
            }
        }
        Err(ArtifactError::NotFound {
            contract: contract.contract_name().clone(),
            probed,
        })
    }

    fn from_file(path: &Path, contract_name: &str) -> Result<Self, ArtifactError> {
        let contents = fs::read_to_string(path).map_err(|source| {
            ArtifactError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let raw: RawArtifact = serde_json::from_str(&contents).map_err(|source| {
            ArtifactError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let bytecode = decode_bytecode(contract_name, &raw.bytecode.object)?;

        Ok(Self {
            contract_name: contract_name.to_string(),
            abi: raw.abi,
            bytecode,
        })
    }
}

fn decode_bytecode(contract_name: &str, object: &str) -> Result<Bytes, ArtifactError> {
    // Solc leaves `__$<hash>$__` placeholders where library addresses still
    // need to be linked in; such bytecode cannot be deployed as-is.
    if object.contains("__$") {
        return Err(ArtifactError::Unlinked(contract_name.to_string()));
    }

    let stripped = object.trim_start_matches("0x");
    if stripped.is_empty() {
        return Err(ArtifactError::EmptyBytecode(contract_name.to_string()));
    }

    let decoded = hex::decode(stripped).map_err(|source| {
        ArtifactError::InvalidHex {
            contract: contract_name.to_string(),
            source,
        }
    })?;
    Ok(Bytes::from(decoded))
}
