//! calexport CLI entry point.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use calexport_client::cli::{Cli, Command, ConfigAction};
use calexport_client::commands;
use calexport_client::config::ClientConfig;
use calexport_client::error::ClientResult;
use calexport_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    // Variables already set in the environment win over .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let tracing_config = TracingConfig::cli(cli.debug).with_format(cli.log_format.into());
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Fetch(args) => {
            let config = load_config(config_path)?;
            commands::fetch::run(args, &config, cli.debug).await
        }
        Command::Project(args) => commands::project::run(args),
        Command::Config { action } => match action {
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Validate { keys_file } => {
                let config = load_config(config_path)?;
                commands::config::validate(&config, &keys_file)
            }
        },
    }
}

fn load_config(path: Option<&Path>) -> ClientResult<ClientConfig> {
    match path {
        Some(path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    }
}
