//! Error types for the deployer core.
//!
//! Artifact and encoding errors live next to their modules; this module
//! holds the errors crossing crate boundaries.

use crate::{
    artifact::ArtifactError,
    encode_args::EncodeArgsError,
};
use alloy_primitives::TxHash;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error(transparent)]
    EncodeArgs(#[from] EncodeArgsError),
    #[error("invalid RPC URL: {0}")]
    InvalidRpcUrl(#[from] url::ParseError),
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(#[from] alloy::signers::local::LocalSignerError),
    #[error("RPC transport error: {0}")]
    Transport(#[from] alloy::transports::TransportError),
    #[error("failed while awaiting deployment confirmation: {0}")]
    Confirmation(#[from] alloy::providers::PendingTransactionError),
    #[error("deployment of {contract} reverted (tx {tx_hash})")]
    Reverted { contract: String, tx_hash: TxHash },
    #[error("deployment receipt for {contract} carries no contract address (tx {tx_hash})")]
    MissingContractAddress { contract: String, tx_hash: TxHash },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory for this platform")]
    NoConfigDir,
    #[error("failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}
