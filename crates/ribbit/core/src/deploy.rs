//! Sequential deployment of the Ribbit protocol contracts.
//!
//! `ribbit deploy` walks a fixed plan: `RibbitToken` first, `RibbitStaking`
//! second. Each step resolves the contract's build artifact, submits the
//! deployment transaction, and suspends until the network confirms it; the
//! next step never starts before the previous one has a confirmed address.
//! The first failure aborts the remaining steps.

use crate::{
    DEFAULT_RPC_URL,
    artifact::{
        ContractArtifact,
        DEFAULT_OUT_DIR,
    },
    config::{
        CliConfig,
        DeploymentRecord,
    },
    encode_args::encode_constructor_args,
    error::DeployError,
};
use alloy::{
    network::{
        EthereumWallet,
        TransactionBuilder,
    },
    providers::{
        Provider,
        ProviderBuilder,
    },
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use alloy_primitives::{
    Address,
    Bytes,
    TxHash,
};
use chrono::Utc;
use clap::{
    Parser,
    ValueHint,
};
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use ribbit_common::{
    Contract,
    args::CliArgs,
};
use serde_json::json;
use std::path::PathBuf;
use tokio::time::Duration;
use url::Url;

/// One step of the deployment plan.
struct PlannedContract {
    contract_name: &'static str,
    display_name: &'static str,
}

/// The protocol deployment order. Staking is never attempted before the
/// token deployment is confirmed.
const DEPLOY_PLAN: &[PlannedContract] = &[
    PlannedContract {
        contract_name: "RibbitToken",
        display_name: "$RIBBIT Token",
    },
    PlannedContract {
        contract_name: "RibbitStaking",
        display_name: "$RIBBIT Staking",
    },
];

/// A confirmed deployment.
#[derive(Debug, Clone)]
pub struct Deployed {
    pub contract_name: String,
    pub address: Address,
    pub tx_hash: TxHash,
    pub chain_id: u64,
}

/// Command-line arguments for deploying the protocol contracts.
#[derive(Parser)]
#[clap(
    name = "deploy",
    about = "Deploy the Ribbit protocol contracts.",
    long_about = "Deploy the $RIBBIT token and staking contracts, in that order, awaiting on-chain confirmation for each. Confirmed deployments are recorded in the ribbit config so `ribbit config show` can find them later."
)]
pub struct DeployArgs {
    /// JSON-RPC endpoint of the target network
    #[clap(
        long = "rpc-url",
        short = 'r',
        env = "RIBBIT_RPC_URL",
        value_hint = ValueHint::Url,
        default_value = DEFAULT_RPC_URL
    )]
    pub rpc_url: String,

    /// Hex-encoded private key of the deployer account
    #[clap(
        long = "private-key",
        short = 'k',
        env = "RIBBIT_PRIVATE_KEY",
        hide_env_values = true
    )]
    pub private_key: String,

    /// Root directory of the contracts project
    #[clap(
        long,
        value_hint = ValueHint::DirPath,
        help = "Root directory containing the forge build output (defaults to the current directory)."
    )]
    pub root: Option<PathBuf>,
}

impl DeployArgs {
    /// Creates and configures a progress spinner for displaying operation status.
    fn create_spinner() -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner} {msg}")
                .expect("Failed to set spinner style"),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }

    /// Build output directory the artifacts are resolved from.
    fn out_dir(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_OUT_DIR)
    }

    fn resolve_artifact(&self, contract_name: &str) -> Result<ContractArtifact, DeployError> {
        let contract = Contract::new(None, contract_name.to_string());
        Ok(ContractArtifact::resolve(&self.out_dir(), &contract)?)
    }

    /// Submits the deployment transaction for `artifact` and suspends until
    /// the network confirms it.
    async fn deploy_contract(
        &self,
        provider: &impl Provider,
        planned: &PlannedContract,
        artifact: &ContractArtifact,
    ) -> Result<Deployed, DeployError> {
        let chain_id = provider.get_chain_id().await?;
        let code = deploy_code(artifact)?;
        let tx = TransactionRequest::default().with_deploy_code(code);

        let pending = provider.send_transaction(tx).await?;
        let receipt = pending.get_receipt().await?;
        let tx_hash = receipt.transaction_hash;

        if !receipt.status() {
            return Err(DeployError::Reverted {
                contract: planned.contract_name.to_string(),
                tx_hash,
            });
        }

        let address = receipt.contract_address.ok_or_else(|| {
            DeployError::MissingContractAddress {
                contract: planned.contract_name.to_string(),
                tx_hash,
            }
        })?;

        Ok(Deployed {
            contract_name: planned.contract_name.to_string(),
            address,
            tx_hash,
            chain_id,
        })
    }

    /// Prints the confirmation for a deployed contract.
    fn announce(planned: &PlannedContract, deployed: &Deployed, json_output: bool) {
        if json_output {
            let output = json!({
                "status": "success",
                "contract": deployed.contract_name,
                "address": deployed.address,
                "tx_hash": deployed.tx_hash,
                "chain_id": deployed.chain_id,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        } else {
            println!("{}", announcement(planned.display_name, deployed.address));
        }
    }

    /// Executes the deployment plan.
    ///
    /// Steps run strictly in order; each contract's artifact is resolved only
    /// once the previous deployment is confirmed, and the first failure
    /// aborts everything that follows.
    ///
    /// # Errors
    /// * Returns `DeployError` if the signer or RPC URL is invalid
    /// * Returns `DeployError` if an artifact cannot be resolved
    /// * Returns `DeployError` if submission or confirmation fails
    pub async fn run(
        &self,
        cli_args: &CliArgs,
        config: &mut CliConfig,
    ) -> Result<(), DeployError> {
        let json_output = cli_args.json_output();
        let signer: PrivateKeySigner = self.private_key.trim().parse()?;
        let rpc_url = Url::parse(&self.rpc_url)?;
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url);
        let total = DEPLOY_PLAN.len();

        for (index, planned) in DEPLOY_PLAN.iter().enumerate() {
            let spinner = if json_output {
                ProgressBar::hidden()
            } else {
                Self::create_spinner()
            };

            if !json_output {
                spinner.set_message(format!(
                    "Deploying {} ({}/{})...",
                    planned.contract_name,
                    index + 1,
                    total
                ));
            }

            let artifact = self.resolve_artifact(planned.contract_name)?;
            let deployed = self.deploy_contract(&provider, planned, &artifact).await?;

            if !json_output {
                spinner.finish_and_clear();
            }
            Self::announce(planned, &deployed, json_output);

            config.add_deployment(DeploymentRecord {
                contract_name: deployed.contract_name.clone(),
                address: deployed.address,
                tx_hash: deployed.tx_hash,
                chain_id: deployed.chain_id,
                deployed_at: Utc::now(),
            });
        }

        Ok(())
    }
}

/// Creation bytecode with the encoded constructor arguments appended.
///
/// Both protocol contracts deploy without constructor arguments; the encoder
/// still validates that the artifact does not expect any.
fn deploy_code(artifact: &ContractArtifact) -> Result<Bytes, DeployError> {
    let encoded_args = encode_constructor_args(&artifact.abi, &[])?;
    let mut code = artifact.bytecode.to_vec();
    code.extend_from_slice(&encoded_args);
    Ok(Bytes::from(code))
}

/// The address announcement line for a confirmed deployment.
pub fn announcement(display_name: &str, address: Address) -> String {
    format!("{display_name} contract deployed to: {address}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactError;
    use std::{
        fs,
        path::Path,
    };
    use tempfile::TempDir;

    /// Anvil's first default account key; any 32-byte hex key works here.
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn write_artifact(root: &Path, contract_name: &str) {
        let dir = root
            .join(DEFAULT_OUT_DIR)
            .join(format!("{contract_name}.sol"));
        fs::create_dir_all(&dir).unwrap();
        let artifact = serde_json::json!({
            "abi": [],
            "bytecode": { "object": "0x60006000f3", "linkReferences": {} },
        });
        fs::write(
            dir.join(format!("{contract_name}.json")),
            artifact.to_string(),
        )
        .unwrap();
    }

    fn deploy_args(rpc_url: &str, root: Option<PathBuf>) -> DeployArgs {
        DeployArgs {
            rpc_url: rpc_url.to_string(),
            private_key: TEST_PRIVATE_KEY.to_string(),
            root,
        }
    }

    #[test]
    fn plan_deploys_token_before_staking() {
        assert_eq!(DEPLOY_PLAN.len(), 2);
        assert_eq!(DEPLOY_PLAN[0].contract_name, "RibbitToken");
        assert_eq!(DEPLOY_PLAN[0].display_name, "$RIBBIT Token");
        assert_eq!(DEPLOY_PLAN[1].contract_name, "RibbitStaking");
        assert_eq!(DEPLOY_PLAN[1].display_name, "$RIBBIT Staking");
    }

    #[test]
    fn announcement_matches_expected_format() {
        let address: Address = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
            .parse()
            .unwrap();
        assert_eq!(
            announcement("$RIBBIT Token", address),
            "$RIBBIT Token contract deployed to: 0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
        );
    }

    #[test]
    fn deploy_code_appends_nothing_for_argless_constructors() {
        let artifact = ContractArtifact {
            contract_name: "RibbitToken".to_string(),
            abi: serde_json::from_str("[]").unwrap(),
            bytecode: Bytes::from(vec![0x60, 0x00, 0x60, 0x00, 0xf3]),
        };
        let code = deploy_code(&artifact).unwrap();
        assert_eq!(code, artifact.bytecode);
    }

    #[test]
    fn deploy_code_rejects_argument_bearing_constructors() {
        let abi = serde_json::from_str(
            r#"[{"type":"constructor","stateMutability":"nonpayable","inputs":[{"name":"cap","type":"uint256","internalType":"uint256"}]}]"#,
        )
        .unwrap();
        let artifact = ContractArtifact {
            contract_name: "RibbitToken".to_string(),
            abi,
            bytecode: Bytes::from(vec![0x60, 0x00]),
        };
        let result = deploy_code(&artifact);
        assert!(matches!(result, Err(DeployError::EncodeArgs(_))));
    }

    #[tokio::test]
    async fn invalid_private_key_fails_before_anything_else() {
        let args = DeployArgs {
            rpc_url: "http://127.0.0.1:1".to_string(),
            private_key: "not-a-key".to_string(),
            root: None,
        };
        let mut config = CliConfig::default();

        let result = args.run(&CliArgs::default(), &mut config).await;
        assert!(matches!(result, Err(DeployError::InvalidPrivateKey(_))));
        assert!(config.deployments.is_empty());
    }

    #[tokio::test]
    async fn invalid_rpc_url_is_rejected() {
        let args = deploy_args("not a url", None);
        let mut config = CliConfig::default();

        let result = args.run(&CliArgs::default(), &mut config).await;
        assert!(matches!(result, Err(DeployError::InvalidRpcUrl(_))));
    }

    #[tokio::test]
    async fn missing_token_artifact_stops_the_run_before_staking() {
        let tmp = TempDir::new().unwrap();
        // Only the staking artifact exists; the run must fail while resolving
        // the token, without attempting anything for staking.
        write_artifact(tmp.path(), "RibbitStaking");

        let args = deploy_args("http://127.0.0.1:1", Some(tmp.path().to_path_buf()));
        let mut config = CliConfig::default();

        let result = args.run(&CliArgs::parse_from(["test", "--json"]), &mut config).await;
        match result {
            Err(DeployError::Artifact(ArtifactError::NotFound { contract, .. })) => {
                assert_eq!(contract, "RibbitToken");
            }
            other => panic!("expected token artifact NotFound, got: {other:?}"),
        }
        assert!(config.deployments.is_empty());
    }

    #[tokio::test]
    async fn unreachable_rpc_aborts_with_no_deployments_recorded() {
        let tmp = TempDir::new().unwrap();
        write_artifact(tmp.path(), "RibbitToken");
        write_artifact(tmp.path(), "RibbitStaking");

        let args = deploy_args("http://127.0.0.1:1", Some(tmp.path().to_path_buf()));
        let mut config = CliConfig::default();

        let result = args.run(&CliArgs::parse_from(["test", "--json"]), &mut config).await;
        assert!(matches!(result, Err(DeployError::Transport(_))));
        assert!(config.deployments.is_empty());
    }
}
