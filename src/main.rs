// PII Gateway - anonymizing proxy for LLM text generation
// Copyright (c) 2025 PII Gateway Contributors
// Licensed under the MIT License

use clap::Parser;
use pii_gateway::cli::commands::{resolve_config, EXIT_CONFIGURATION, EXIT_FATAL, EXIT_INTERRUPTED};
use pii_gateway::cli::{Cli, Commands};
use pii_gateway::config::{GatewayConfig, LoggingConfig};
use pii_gateway::domain::Result;
use pii_gateway::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = resolve_config(&cli.config);

    // CLI flag wins over the config file; file logging only with a loaded config
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().ok().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());

    let log_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "PII Gateway");

    // Dropping the command future cancels any in-flight generation call
    let exit_code = tokio::select! {
        result = execute_command(&cli, config) => match result {
            Ok(code) => code,
            Err(e) => {
                tracing::error!(error = %e, "Command execution failed");
                eprintln!("Error: {e:#}");
                EXIT_FATAL
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Received SIGINT (Ctrl+C), request cancelled");
            eprintln!("\n⚠️  Interrupted, request cancelled");
            EXIT_INTERRUPTED
        }
    };

    drop(log_guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config: Result<GatewayConfig>) -> anyhow::Result<i32> {
    if let Commands::ValidateConfig(args) = &cli.command {
        return args.execute(&cli.config).await;
    }

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("Failed to load configuration: {e}");
            return Ok(EXIT_CONFIGURATION);
        }
    };

    match &cli.command {
        Commands::Chat(args) => args.execute(&config).await,
        Commands::Anonymize(args) => args.execute(&config).await,
        Commands::Document(args) => args.execute(&config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
    }
}
