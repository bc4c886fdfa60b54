//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::GatewayConfig;
use crate::config::secret_string;
use crate::domain::errors::GatewayError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into GatewayConfig
/// 4. Applies environment variable overrides (PII_GATEWAY_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`GatewayError::Configuration`] if the file cannot be read or
/// parsed, a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use pii_gateway::config::loader::load_config;
///
/// let config = load_config("pii-gateway.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<GatewayConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GatewayError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        GatewayError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text (substitution, overrides, validation)
pub fn load_config_from_str(contents: &str) -> Result<GatewayConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: GatewayConfig = toml::from_str(&contents)
        .map_err(|e| GatewayError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(&mut config)?;
    Ok(config)
}

/// Builds configuration from defaults and `PII_GATEWAY_*` variables only
pub fn load_config_from_env() -> Result<GatewayConfig> {
    let mut config = GatewayConfig::default();
    finish(&mut config)?;
    Ok(config)
}

fn finish(config: &mut GatewayConfig) -> Result<()> {
    apply_env_overrides(config)?;

    config.validate().map_err(|e| {
        GatewayError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied as they are.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| GatewayError::Internal(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(GatewayError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| GatewayError::Configuration(format!("Invalid {name} value: {value}")))
}

/// Applies environment variable overrides using the PII_GATEWAY_* prefix
///
/// Environment variables follow the pattern: PII_GATEWAY_<SECTION>_<KEY>
/// For example: PII_GATEWAY_GENERATION_PROVIDER, PII_GATEWAY_GENERATION_API_KEY
fn apply_env_overrides(config: &mut GatewayConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("PII_GATEWAY_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("PII_GATEWAY_APPLICATION_REQUEST_TIMEOUT_SECONDS") {
        config.application.request_timeout_seconds =
            parse_env("PII_GATEWAY_APPLICATION_REQUEST_TIMEOUT_SECONDS", &val)?;
    }

    // Detection overrides
    config
        .detection
        .apply_env_overrides()
        .map_err(|e| GatewayError::Configuration(format!("{e:#}")))?;

    // Generation overrides
    if let Ok(val) = std::env::var("PII_GATEWAY_GENERATION_PROVIDER") {
        config.generation.provider = val.to_lowercase();
    }
    if let Ok(val) = std::env::var("PII_GATEWAY_GENERATION_API_KEY") {
        config.generation.api_key = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("PII_GATEWAY_GENERATION_MODEL") {
        config.generation.model = val;
    }
    if let Ok(val) = std::env::var("PII_GATEWAY_GENERATION_BASE_URL") {
        config.generation.base_url = val;
    }
    if let Ok(val) = std::env::var("PII_GATEWAY_GENERATION_TIMEOUT_SECONDS") {
        config.generation.timeout_seconds =
            parse_env("PII_GATEWAY_GENERATION_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("PII_GATEWAY_GENERATION_MAX_RETRIES") {
        config.generation.retry.max_retries =
            parse_env("PII_GATEWAY_GENERATION_MAX_RETRIES", &val)?;
    }

    // Document overrides
    if let Ok(val) = std::env::var("PII_GATEWAY_DOCUMENTS_MAX_DOCUMENT_BYTES") {
        config.documents.max_document_bytes =
            parse_env("PII_GATEWAY_DOCUMENTS_MAX_DOCUMENT_BYTES", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PII_GATEWAY_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("PII_GATEWAY_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("PII_GATEWAY_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("PII_GATEWAY_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
