//! Configuration management for the gateway.
//!
//! TOML configuration with `${VAR_NAME}` substitution, `PII_GATEWAY_*`
//! environment overrides, defaults for every setting, and validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pii_gateway::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pii-gateway.toml")?;
//!
//! println!("Provider: {}", config.generation.provider);
//! println!("Phone detection: {}", config.detection.phone_enabled);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and per-request timeout
//! - [`DetectionConfig`](crate::anonymization::DetectionConfig) - Detectors and audit trail
//! - [`GenerationConfig`] - Provider, credentials, retry policy
//! - [`DocumentsConfig`] - Document size limit
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! request_timeout_seconds = 120
//!
//! [detection]
//! entity_lexicon = "lexicon/entities.toml"
//!
//! [detection.audit]
//! enabled = true
//!
//! [generation]
//! provider = "gemini"
//! api_key = "${GEMINI_API_KEY}"
//! model = "gemini-2.0-flash"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_env, load_config_from_str};
pub use schema::{
    ApplicationConfig, DocumentsConfig, GatewayConfig, GenerationConfig, LoggingConfig,
    RetryConfig, SUPPORTED_PROVIDERS,
};
pub use secret::{secret_string, SecretString, SecretValue};
