//! Sparqlgate CLI
//!
//! Command-line interface for the Sparqlgate query gateway.

use clap::Parser;
use sparqlgate_cli::{Cli, Commands, LogFormat};
use sparqlgate_core::GatewayError;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), GatewayError> {
    let cli = Cli::parse();
    let config_path = cli.config_path().to_string();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    // Logs go to stderr so `query` output stays pipeable
    match cli.log_format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }

    // Execute command
    match cli.command {
        Commands::Run(cmd) => {
            cmd.execute(&config_path).await?;
        }
        Commands::Dev(cmd) => {
            cmd.execute(&config_path).await?;
        }
        Commands::Query(cmd) => {
            cmd.execute(&config_path).await?;
        }
        Commands::Init(cmd) => {
            cmd.execute().await?;
        }
        Commands::Completion(cmd) => {
            cmd.execute();
        }
    }

    Ok(())
}
