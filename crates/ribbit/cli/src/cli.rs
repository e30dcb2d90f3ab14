use clap::Parser;
use ribbit_common::args::CliArgs;
use ribbit_core::{
    DEFAULT_RPC_URL,
    config::ConfigArgs,
    deploy::DeployArgs,
};
use std::sync::OnceLock;

fn version_message() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION
        .get_or_init(|| {
            format!(
                "{}\nDefault RPC URL: {}",
                env!("CARGO_PKG_VERSION"),
                DEFAULT_RPC_URL,
            )
        })
        .as_str()
}

#[derive(Parser)]
#[command(
    name = "ribbit",
    version = version_message(),
    long_version = version_message(),
    about = "Deployment CLI for the Ribbit protocol"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    #[command(flatten)]
    pub args: CliArgs,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    #[command(name = "deploy")]
    Deploy(DeployArgs),
    #[command(about = "Inspect the deployment ledger")]
    Config(ConfigArgs),
}
