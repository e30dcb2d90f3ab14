use clap::Parser;
use std::path::PathBuf;

/// Flags shared by every `ribbit` subcommand.
#[derive(Debug, Parser, Clone, Default)]
pub struct CliArgs {
    /// Emit machine-readable JSON instead of human output
    #[clap(short, long)]
    pub json: bool,
    /// Override the directory the deployment ledger is stored in
    #[clap(hide = true)]
    pub config_dir: Option<PathBuf>,
}

impl CliArgs {
    pub fn json_output(&self) -> bool {
        self.json
    }
}
