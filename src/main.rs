use clap::Parser;
use colored::Colorize;
use ihjs::cli::{execute, init_logging, Cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load config (file, env overrides, --verbose) before logging so the level applies
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging.level);
    tracing::debug!("{}", config.summary());

    match execute(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            ExitCode::FAILURE
        }
    }
}
