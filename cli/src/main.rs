//! cats: acceptance tests for a Cloud Foundry style platform

use std::process::ExitCode;

use cats_cli::app::classify_error;
use cats_cli::cli::Cli;
use cats_cli::infra::logging;
use cats_cli::output::json::format_error;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;
    logging::init(cli.verbose);

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let (code, kind) = classify_error(&e);
            tracing::debug!(error = ?e, kind, "command failed");
            if json {
                match format_error(&format!("{e:#}"), kind) {
                    Ok(body) => println!("{body}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::from(code)
        }
    }
}
