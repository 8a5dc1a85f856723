use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use folio::cli::Cli;

/// Environment variable holding the log filter (default: warn)
const LOG_ENV: &str = "FOLIO_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing for logging; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
