use std::process::ExitCode;

use catalog_admin::cli::{self, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = catalog_admin::logging::init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
