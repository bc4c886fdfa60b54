//! Pattern library for PII detection

use crate::anonymization::models::PiiCategory;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Regex patterns for this category
    pub patterns: Vec<String>,
    /// Confidence score (0.0 - 1.0)
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    /// PII category label
    pub category: String,
}

fn default_confidence() -> f32 {
    1.0
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Name of the definition this pattern came from
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// PII category
    pub category: PiiCategory,
    /// Confidence score
    pub confidence: f32,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: BTreeMap<String, PatternDefinition>,
}

/// Pattern registry for PII detection
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut patterns = Vec::new();

        for (name, def) in library.patterns {
            let category: PiiCategory = def
                .category
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| {
                    format!("Invalid category in pattern '{}': {}", name, def.category)
                })?;

            if !(0.0..=1.0).contains(&def.confidence) {
                anyhow::bail!(
                    "Confidence for pattern '{name}' must be between 0.0 and 1.0, got {}",
                    def.confidence
                );
            }

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str)
                    .with_context(|| format!("Invalid regex in pattern '{name}': {pattern_str}"))?;

                patterns.push(CompiledPattern {
                    name: name.clone(),
                    regex,
                    category,
                    confidence: def.confidence,
                });
            }
        }

        if patterns.is_empty() {
            anyhow::bail!("Pattern library defines no patterns");
        }

        Ok(Self { patterns })
    }

    /// Create a default pattern registry with built-in patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Get all patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Get patterns for a specific category
    pub fn patterns_for_category(
        &self,
        category: PiiCategory,
    ) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter().filter(move |p| p.category == category)
    }
}
