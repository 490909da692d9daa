//! ssh-cli - Manage SSH config hosts and their key pairs

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ssh_cli::cli::Cli;
use ssh_cli::commands::Outcome;
use ssh_cli::output::json::{error_code, format_error};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SSH_CLI_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    match cli.run().await {
        Ok(Outcome::Done | Outcome::Cancelled) => {}
        Ok(Outcome::Failed) => std::process::exit(1),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            let message = format!("{e:#}");
            match format_error(&message, error_code(&e)) {
                Ok(text) if json => println!("{text}"),
                _ => eprintln!("Error: {message}"),
            }
            std::process::exit(1);
        }
    }
}
