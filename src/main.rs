use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use sarajod_lib::bootstrap::{init_tracing_subscriber, resolve_config, wire_services};
use sarajod_lib::cli::{self, Cli};
use sarajod_lib::TerminalScreenRouter;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match resolve_config(cli.config.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_tracing_subscriber(&config.logs_dir()) {
        eprintln!("Failed to initialize tracing: {err:#}");
    }

    let services = match wire_services(&config, Arc::new(TerminalScreenRouter::stdout())) {
        Ok(services) => services,
        Err(err) => {
            error!(error = %err, "failed to wire services");
            eprintln!("Failed to start: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match cli::run(cli.command, &services).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
