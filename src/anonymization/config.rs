//! Detection and audit configuration

use crate::anonymization::detector::phone::{DEFAULT_MAX_DIGITS, DEFAULT_MIN_DIGITS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which detectors make up the engine, and how they are tuned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Enable the pattern-library detector
    #[serde(default = "default_true")]
    pub regex_enabled: bool,

    /// Custom pattern library (TOML); the built-in library is used when unset
    pub pattern_library: Option<PathBuf>,

    /// Minimum pattern confidence for the regex detector
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Enable the phone number detector
    #[serde(default = "default_true")]
    pub phone_enabled: bool,

    /// Minimum digit count for a phone number
    #[serde(default = "default_phone_min_digits")]
    pub phone_min_digits: usize,

    /// Maximum digit count for a phone number
    #[serde(default = "default_phone_max_digits")]
    pub phone_max_digits: usize,

    /// Enable the PESEL detector
    #[serde(default = "default_true")]
    pub national_id_enabled: bool,

    /// Entity lexicon (TOML); enables the named-entity detector when set
    pub entity_lexicon: Option<PathBuf>,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_true() -> bool {
    true
}

fn default_confidence_threshold() -> f32 {
    0.7
}

fn default_phone_min_digits() -> usize {
    DEFAULT_MIN_DIGITS
}

fn default_phone_max_digits() -> usize {
    DEFAULT_MAX_DIGITS
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            regex_enabled: true,
            pattern_library: None,
            confidence_threshold: default_confidence_threshold(),
            phone_enabled: true,
            phone_min_digits: DEFAULT_MIN_DIGITS,
            phone_max_digits: DEFAULT_MAX_DIGITS,
            national_id_enabled: true,
            entity_lexicon: None,
            audit: AuditConfig::default(),
        }
    }
}

impl DetectionConfig {
    /// Whether at least one detector is enabled
    pub fn any_enabled(&self) -> bool {
        self.regex_enabled
            || self.phone_enabled
            || self.national_id_enabled
            || self.entity_lexicon.is_some()
    }

    /// Validate the configuration
    ///
    /// File contents are not parsed here; a broken pattern library or
    /// lexicon surfaces when the engine is assembled.
    pub fn validate(&self) -> Result<()> {
        if !self.any_enabled() {
            anyhow::bail!("At least one PII detector must be enabled");
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            anyhow::bail!(
                "confidence_threshold must be between 0.0 and 1.0, got {}",
                self.confidence_threshold
            );
        }

        if self.phone_enabled
            && (self.phone_min_digits == 0 || self.phone_min_digits > self.phone_max_digits)
        {
            anyhow::bail!(
                "phone_min_digits ({}) must be at least 1 and not exceed phone_max_digits ({})",
                self.phone_min_digits,
                self.phone_max_digits
            );
        }

        for (key, path) in [
            ("pattern_library", &self.pattern_library),
            ("entity_lexicon", &self.entity_lexicon),
        ] {
            if let Some(path) = path {
                if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                    anyhow::bail!("{key} must be a TOML file: {}", path.display());
                }
            }
        }

        self.audit.validate().context("Invalid audit configuration")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("PII_GATEWAY_DETECTION_REGEX_ENABLED") {
            self.regex_enabled = val
                .parse()
                .context("Invalid PII_GATEWAY_DETECTION_REGEX_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("PII_GATEWAY_DETECTION_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("PII_GATEWAY_DETECTION_CONFIDENCE_THRESHOLD") {
            self.confidence_threshold = val
                .parse()
                .context("Invalid PII_GATEWAY_DETECTION_CONFIDENCE_THRESHOLD value")?;
        }

        if let Ok(val) = std::env::var("PII_GATEWAY_DETECTION_PHONE_ENABLED") {
            self.phone_enabled = val
                .parse()
                .context("Invalid PII_GATEWAY_DETECTION_PHONE_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("PII_GATEWAY_DETECTION_NATIONAL_ID_ENABLED") {
            self.national_id_enabled = val
                .parse()
                .context("Invalid PII_GATEWAY_DETECTION_NATIONAL_ID_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("PII_GATEWAY_DETECTION_ENTITY_LEXICON") {
            self.entity_lexicon = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path (JSON lines)
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/pii-gateway.jsonl")
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path cannot be empty when audit is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("PII_GATEWAY_DETECTION_AUDIT_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid PII_GATEWAY_DETECTION_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("PII_GATEWAY_DETECTION_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        Ok(())
    }
}
