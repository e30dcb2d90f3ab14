mod cli;

use crate::cli::{
    Cli,
    Commands,
};
use clap::Parser;
use color_eyre::{
    Result,
    eyre::Report,
};
use ribbit_core::config::CliConfig;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure color_eyre to hide location information and backtrace messages
    color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install()?;

    let cli = Cli::parse();
    let mut config = CliConfig::read_from_file(&cli.args).unwrap_or_default();

    let result = async {
        match cli.command {
            Commands::Deploy(deploy) => {
                deploy.run(&cli.args, &mut config).await?;
            }
            Commands::Config(config_cmd) => {
                config_cmd.run(&cli.args, &config)?;
            }
        }
        Ok::<_, Report>(())
    }
    .await;

    // Persist the ledger before converting the outcome to an exit status, so
    // deployments confirmed before a failure stay recorded.
    let write_result = config.write_to_file(&cli.args);

    if let Err(err) = result {
        if cli.args.json_output() {
            eprintln!(
                "{}",
                json!({
                    "status": "error",
                    "error": {
                        "message": err.to_string(),
                    }
                })
            );
            std::process::exit(1);
        } else {
            return Err(err);
        }
    }
    write_result?;

    Ok(())
}
