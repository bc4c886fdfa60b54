//! Validate config command implementation
//!
//! Loads and validates the configuration, then assembles the detectors so
//! that missing pattern libraries or lexicons surface here rather than on
//! the first request.

use super::{exit_code, resolve_config, EXIT_SUCCESS};
use crate::anonymization::AnonymizationEngine;
use crate::config::GatewayConfig;
use crate::domain::Result;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");
        println!("🔍 Validating configuration: {config_path}");
        println!();

        Ok(report(resolve_config(config_path)))
    }
}

fn report(loaded: Result<GatewayConfig>) -> i32 {
    let config = match loaded {
        Ok(c) => {
            println!("✅ Configuration loaded and valid");
            c
        }
        Err(e) => {
            println!("❌ Configuration validation failed");
            println!("   Error: {e}");
            return exit_code(&e);
        }
    };

    let engine = match AnonymizationEngine::from_config(&config.detection) {
        Ok(engine) => {
            println!("✅ Detectors initialized");
            engine
        }
        Err(e) => {
            println!("❌ Detector initialization failed");
            println!("   Error: {e}");
            return exit_code(&e);
        }
    };

    println!();
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!(
        "  Request Timeout: {}s",
        config.application.request_timeout_seconds
    );
    println!("  Detectors: {}", engine.detector_names().join(", "));
    println!(
        "  Audit Trail: {}",
        if config.detection.audit.enabled {
            config.detection.audit.log_path.display().to_string()
        } else {
            "disabled".to_string()
        }
    );
    println!("  Generation Provider: {}", config.generation.provider);
    if config.generation.provider == "gemini" {
        println!("  Model: {}", config.generation.model);
        println!("  Base URL: {}", config.generation.base_url);
    }
    println!("  Max Retries: {}", config.generation.retry.max_retries);
    println!(
        "  Max Document Size: {} bytes",
        config.documents.max_document_bytes
    );
    println!();

    EXIT_SUCCESS
}
