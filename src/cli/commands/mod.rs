//! CLI command implementations
//!
//! Commands return process exit codes:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 2 | Configuration error |
//! | 3 | Caller error (validation, unsupported content type) |
//! | 4 | External service error |
//! | 5 | Fatal or internal error |
//! | 130 | Interrupted (Ctrl+C) |

pub mod anonymize;
pub mod chat;
pub mod document;
pub mod validate;

use crate::config::{load_config, load_config_from_env, GatewayConfig};
use crate::core::PiiGateway;
use crate::domain::{GatewayError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "pii-gateway.toml";

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_CONFIGURATION: i32 = 2;
pub const EXIT_CALLER: i32 = 3;
pub const EXIT_EXTERNAL: i32 = 4;
pub const EXIT_FATAL: i32 = 5;
pub const EXIT_INTERRUPTED: i32 = 130;

/// Map an error to its exit code
pub fn exit_code(err: &GatewayError) -> i32 {
    match err {
        GatewayError::Configuration(_) => EXIT_CONFIGURATION,
        GatewayError::Validation(_) | GatewayError::UnsupportedContentType { .. } => EXIT_CALLER,
        GatewayError::ExternalService(_) => EXIT_EXTERNAL,
        GatewayError::DetectorInitialization { .. } | GatewayError::Internal(_) => EXIT_FATAL,
    }
}

/// Load configuration, falling back to defaults plus environment when the
/// default file does not exist
pub fn resolve_config(config_path: &str) -> Result<GatewayConfig> {
    if config_path == DEFAULT_CONFIG_PATH && !Path::new(config_path).exists() {
        tracing::debug!(
            config_path,
            "Default config file not found, using defaults and environment"
        );
        return load_config_from_env();
    }
    load_config(config_path)
}

/// Build the gateway, or print the failure and return its exit code
pub(crate) fn build_gateway(config: &GatewayConfig) -> std::result::Result<PiiGateway, i32> {
    PiiGateway::from_config(config).map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize gateway");
        eprintln!("Failed to initialize gateway: {e}");
        exit_code(&e)
    })
}

/// Print the boundary-safe message and return the exit code
///
/// Full detail goes to the log only.
pub(crate) fn report_error(err: &GatewayError) -> i32 {
    tracing::error!(error = %err, "Request failed");
    eprintln!("Error: {}", err.public_message());
    exit_code(err)
}

/// Take input from an inline argument, a file, or stdin, in that order
pub(crate) fn read_input(inline: Option<&str>, file: Option<&PathBuf>) -> anyhow::Result<String> {
    use anyhow::Context;

    if let Some(text) = inline {
        return Ok(text.to_string());
    }

    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}
