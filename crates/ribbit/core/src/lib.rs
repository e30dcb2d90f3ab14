#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod artifact;
pub mod config;
pub mod deploy;
pub mod encode_args;
pub mod error;

/// Default JSON-RPC endpoint, pointing at a local development node.
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";
