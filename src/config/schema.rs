//! Configuration schema types
//!
//! This module defines the configuration structure that maps to
//! `pii-gateway.toml`. Every section has defaults, so an empty file (or
//! no file at all) yields a working mock-provider setup.

use crate::anonymization::DetectionConfig;
use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Generation providers known to the factory
pub const SUPPORTED_PROVIDERS: [&str; 2] = ["echo", "gemini"];

/// Main gateway configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Detector selection and audit trail
    #[serde(default)]
    pub detection: DetectionConfig,

    /// External text-generation service
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Document redaction limits
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.detection
            .validate()
            .map_err(|e| format!("Invalid detection configuration: {e:#}"))?;
        self.generation.validate()?;
        self.documents.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upper bound for one flow call, generation included
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err("application.request_timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

/// Retry configuration for the generation call
///
/// Only transient failures are retried. Retries are off unless
/// `max_retries` is raised above zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    #[serde(default)]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err("generation.retry.max_retries must be <= 10".to_string());
        }
        if self.backoff_multiplier < 1.0 {
            return Err("generation.retry.backoff_multiplier must be >= 1.0".to_string());
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(
                "generation.retry.initial_delay_ms must not exceed max_delay_ms".to_string(),
            );
        }
        Ok(())
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn delay_for_attempt(&self, attempt: usize) -> u64 {
        let exponent = attempt.saturating_sub(1) as i32;
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        (delay as u64).min(self.max_delay_ms)
    }
}

/// External text-generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Provider name (`echo` or `gemini`)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API key for the provider
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the provider's REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP timeout for one generation attempt
    #[serde(default = "default_generation_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Simulated latency of the echo provider
    #[serde(default)]
    pub echo_delay_ms: u64,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_seconds: default_generation_timeout_seconds(),
            echo_delay_ms: 0,
            retry: RetryConfig::default(),
        }
    }
}

impl GenerationConfig {
    fn validate(&self) -> Result<(), String> {
        if !SUPPORTED_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(format!(
                "Unknown generation provider '{}'. Must be one of: {}",
                self.provider,
                SUPPORTED_PROVIDERS.join(", ")
            ));
        }

        if self.provider == "gemini" {
            match self.api_key {
                Some(ref key) if !key.expose_secret().is_empty() => {}
                _ => return Err("generation.api_key is required for the gemini provider".to_string()),
            }

            if self.model.trim().is_empty() {
                return Err("generation.model cannot be empty".to_string());
            }

            url::Url::parse(&self.base_url)
                .map_err(|e| format!("Invalid generation.base_url '{}': {e}", self.base_url))?;
        }

        if self.timeout_seconds == 0 {
            return Err("generation.timeout_seconds must be > 0".to_string());
        }

        self.retry.validate()
    }
}

/// Document redaction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Largest accepted document, in bytes
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: default_max_document_bytes(),
        }
    }
}

impl DocumentsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_document_bytes == 0 {
            return Err("documents.max_document_bytes must be > 0".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    120
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    8000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_provider() -> String {
    "echo".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_generation_timeout_seconds() -> u64 {
    60
}

fn default_max_document_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
