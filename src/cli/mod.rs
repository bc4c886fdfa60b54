//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the gateway using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// PII Gateway - anonymize text before it reaches an LLM
#[derive(Parser, Debug)]
#[command(name = "pii-gateway")]
#[command(version, about, long_about = None)]
#[command(author = "PII Gateway Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = commands::DEFAULT_CONFIG_PATH,
        env = "PII_GATEWAY_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PII_GATEWAY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send an anonymized prompt to the LLM and print the restored reply
    Chat(commands::chat::ChatArgs),

    /// Anonymize text without calling the LLM
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Redact a text, CSV or JSON document block by block
    Document(commands::document::DocumentArgs),

    /// Validate configuration file and detector resources
    ValidateConfig(commands::validate::ValidateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_cli_parse_chat() {
        let cli = Cli::parse_from(["pii-gateway", "chat", "hello"]);
        assert_eq!(cli.config, "pii-gateway.toml");
        match cli.command {
            Commands::Chat(args) => assert_eq!(args.prompt.as_deref(), Some("hello")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["pii-gateway", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["pii-gateway", "--log-level", "debug", "anonymize", "x"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_anonymize_json() {
        let cli = Cli::parse_from(["pii-gateway", "anonymize", "--json", "--file", "in.txt"]);
        match cli.command {
            Commands::Anonymize(args) => {
                assert!(args.json);
                assert!(args.text.is_none());
                assert_eq!(args.file.unwrap().to_str(), Some("in.txt"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_document() {
        let cli = Cli::parse_from([
            "pii-gateway",
            "document",
            "data.bin",
            "--content-type",
            "text/csv",
            "-o",
            "out.csv",
        ]);
        match cli.command {
            Commands::Document(args) => {
                assert_eq!(args.content_type.as_deref(), Some("text/csv"));
                assert!(args.output.is_some());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test_case(&["pii-gateway", "chat", "hi", "--file", "p.txt"] ; "prompt and file conflict")]
    #[test_case(&["pii-gateway", "document"] ; "document needs a path")]
    fn test_cli_rejects(args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }
}
