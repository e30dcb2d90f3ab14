//! Persistent CLI configuration: the deployment ledger.
//!
//! Every confirmed deployment is recorded here so later runs (and the
//! `ribbit config` command) can tell where the protocol lives on a given
//! chain. The ledger is stored as TOML in the platform config directory,
//! overridable through the hidden `--config-dir` flag.

use crate::error::ConfigError;
use alloy_primitives::{
    Address,
    TxHash,
};
use chrono::{
    DateTime,
    Utc,
};
use colored::Colorize;
use ribbit_common::args::CliArgs;
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::json;
use std::{
    collections::HashMap,
    fmt,
    fs,
    path::PathBuf,
};

/// Ledger key: a contract name on a specific chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct DeploymentKey {
    pub contract_name: String,
    pub chain_id: u64,
}

impl DeploymentKey {
    pub fn new(contract_name: String, chain_id: u64) -> Self {
        Self {
            contract_name,
            chain_id,
        }
    }
}

impl fmt::Display for DeploymentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.contract_name, self.chain_id)
    }
}

impl From<DeploymentKey> for String {
    fn from(key: DeploymentKey) -> Self {
        key.to_string()
    }
}

impl From<String> for DeploymentKey {
    fn from(value: String) -> Self {
        // Keys written by older versions without a chain suffix fall back to
        // chain id 0 rather than failing deserialization of the whole file.
        match value.rsplit_once('@') {
            Some((contract_name, chain)) => {
                match chain.parse() {
                    Ok(chain_id) => Self::new(contract_name.to_string(), chain_id),
                    Err(_) => Self::new(value.clone(), 0),
                }
            }
            None => Self::new(value, 0),
        }
    }
}

/// A confirmed deployment as recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub address: Address,
    pub tx_hash: TxHash,
    pub chain_id: u64,
    pub deployed_at: DateTime<Utc>,
}

impl DeploymentRecord {
    pub fn key(&self) -> DeploymentKey {
        DeploymentKey::new(self.contract_name.clone(), self.chain_id)
    }
}

impl fmt::Display for DeploymentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Contract: {}", self.contract_name)?;
        writeln!(f, "Address: {}", self.address)?;
        writeln!(f, "Transaction: {}", self.tx_hash)?;
        writeln!(f, "Chain ID: {}", self.chain_id)?;
        write!(f, "Deployed At: {}", self.deployed_at)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub deployments: HashMap<DeploymentKey, DeploymentRecord>,
}

impl CliConfig {
    const CONFIG_FILE: &'static str = "config.toml";

    fn config_file(cli_args: &CliArgs) -> Result<PathBuf, ConfigError> {
        let dir = match &cli_args.config_dir {
            Some(dir) => dir.clone(),
            None => {
                dirs::config_dir()
                    .ok_or(ConfigError::NoConfigDir)?
                    .join("ribbit")
            }
        };
        Ok(dir.join(Self::CONFIG_FILE))
    }

    pub fn read_from_file(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let path = Self::config_file(cli_args)?;
        let contents = fs::read_to_string(&path).map_err(|source| {
            ConfigError::Read {
                path: path.clone(),
                source,
            }
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn write_to_file(&self, cli_args: &CliArgs) -> Result<(), ConfigError> {
        let path = Self::config_file(cli_args)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| {
                ConfigError::Write {
                    path: path.clone(),
                    source,
                }
            })?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents).map_err(|source| ConfigError::Write { path, source })
    }

    pub fn add_deployment(&mut self, record: DeploymentRecord) {
        self.deployments.insert(record.key(), record);
    }

    pub fn deployment(&self, key: &DeploymentKey) -> Option<&DeploymentRecord> {
        self.deployments.get(key)
    }
}

/// Arguments for inspecting the deployment ledger.
#[derive(clap::Parser)]
#[clap(name = "config", about = "Inspect the deployment ledger")]
pub struct ConfigArgs {
    #[clap(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Show recorded deployments")]
    Show,
    #[command(about = "Print the config file location")]
    Path,
}

impl ConfigArgs {
    pub fn run(&self, cli_args: &CliArgs, config: &CliConfig) -> Result<(), ConfigError> {
        match self.command {
            ConfigCommand::Show => {
                Self::show(cli_args, config);
                Ok(())
            }
            ConfigCommand::Path => {
                println!("{}", CliConfig::config_file(cli_args)?.display());
                Ok(())
            }
        }
    }

    fn show(cli_args: &CliArgs, config: &CliConfig) {
        let mut records: Vec<&DeploymentRecord> = config.deployments.values().collect();
        records.sort_by(|a, b| {
            (a.chain_id, &a.contract_name).cmp(&(b.chain_id, &b.contract_name))
        });

        if cli_args.json_output() {
            let output = json!({ "deployments": records });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        } else if records.is_empty() {
            println!("No deployments recorded yet.");
        } else {
            println!("{}", "Recorded Deployments".bold().green());
            println!("{}", "====================".green());
            for record in records {
                println!("\n{record}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(contract_name: &str, chain_id: u64) -> DeploymentRecord {
        DeploymentRecord {
            contract_name: contract_name.to_string(),
            address: Address::repeat_byte(0x11),
            tx_hash: TxHash::repeat_byte(0x22),
            chain_id,
            deployed_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    #[test]
    fn key_string_round_trip() {
        let key = DeploymentKey::new("RibbitToken".to_string(), 31337);
        let as_string = String::from(key.clone());
        assert_eq!(as_string, "RibbitToken@31337");
        assert_eq!(DeploymentKey::from(as_string), key);
    }

    #[test]
    fn key_without_chain_suffix_falls_back_to_chain_zero() {
        let key = DeploymentKey::from("RibbitToken".to_string());
        assert_eq!(key.contract_name, "RibbitToken");
        assert_eq!(key.chain_id, 0);
    }

    #[test]
    fn add_deployment_is_keyed_by_contract_and_chain() {
        let mut config = CliConfig::default();
        config.add_deployment(record("RibbitToken", 1));
        config.add_deployment(record("RibbitToken", 31337));

        assert_eq!(config.deployments.len(), 2);
        let key = DeploymentKey::new("RibbitToken".to_string(), 31337);
        assert_eq!(config.deployment(&key).unwrap().chain_id, 31337);
    }

    #[test]
    fn config_round_trips_through_file() {
        let tmp = TempDir::new().unwrap();
        let cli_args = CliArgs {
            config_dir: Some(tmp.path().to_path_buf()),
            ..Default::default()
        };

        let mut config = CliConfig::default();
        config.add_deployment(record("RibbitToken", 31337));
        config.add_deployment(record("RibbitStaking", 31337));
        config.write_to_file(&cli_args).unwrap();

        let read_back = CliConfig::read_from_file(&cli_args).unwrap();
        assert_eq!(read_back.deployments.len(), 2);
        assert_eq!(
            read_back
                .deployment(&DeploymentKey::new("RibbitToken".to_string(), 31337))
                .unwrap(),
            config
                .deployment(&DeploymentKey::new("RibbitToken".to_string(), 31337))
                .unwrap()
        );
    }

    #[test]
    fn read_from_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let cli_args = CliArgs {
            config_dir: Some(tmp.path().to_path_buf()),
            ..Default::default()
        };

        let result = CliConfig::read_from_file(&cli_args);
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn record_display_includes_address_and_chain() {
        let record = record("RibbitToken", 31337);
        let rendered = record.to_string();
        assert!(rendered.contains("Contract: RibbitToken"));
        assert!(rendered.contains("Chain ID: 31337"));
        assert!(rendered.contains(&record.address.to_string()));
    }
}
