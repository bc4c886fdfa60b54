//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`], which turns text into
//! placeholder-substituted text plus a [`RestorationMapping`], and reverses
//! the substitution on text that came back from the other side.
//!
//! # Pipeline
//!
//! 1. Every configured detector scans the input; spans are pooled.
//! 2. [`resolve_overlaps`] picks a non-overlapping left-to-right subset.
//! 3. Each accepted span gets a token. Repeated values reuse the token
//!    issued for their first occurrence.
//! 4. The output is rebuilt from the untouched gaps and the tokens.
//!
//! # Examples
//!
//! ```
//! use pii_gateway::anonymization::{AnonymizationEngine, DetectionConfig};
//!
//! # fn example() -> pii_gateway::domain::Result<()> {
//! let engine = AnonymizationEngine::from_config(&DetectionConfig::default())?;
//!
//! let anonymized = engine.anonymize("Write to jan@example.com");
//! assert!(!anonymized.text.contains("jan@example.com"));
//!
//! let restored = engine.restore(&anonymized.text, &anonymized.mapping);
//! assert_eq!(restored, "Write to jan@example.com");
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    config::DetectionConfig,
    detector::{
        patterns::PatternRegistry, EntityLexiconDetector, NationalIdDetector, PhoneDetector,
        PiiDetector, RegexDetector,
    },
    mapping::{MappingEntry, RestorationMapping},
    models::DetectedSpan,
    resolver::resolve_overlaps,
    tokenization::TokenGenerator,
};
use crate::domain::{GatewayError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Result of one anonymization call
#[derive(Debug, Clone)]
pub struct AnonymizedText {
    /// Input with every accepted span replaced by its token
    pub text: String,
    /// Token to original value association for this call only
    pub mapping: RestorationMapping,
}

/// Main anonymization engine
///
/// Holds only immutable, shared detector instances; every call builds its
/// own candidate list, token map and mapping. Wrap it in an `Arc` to share
/// it across concurrent requests.
pub struct AnonymizationEngine {
    detectors: Vec<Arc<dyn PiiDetector>>,
}

impl AnonymizationEngine {
    /// Assemble an engine from already-constructed detectors
    pub fn new(detectors: Vec<Arc<dyn PiiDetector>>) -> Self {
        Self { detectors }
    }

    /// Build the detectors named by `config` and assemble an engine
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] when the section is invalid,
    /// and [`GatewayError::DetectorInitialization`] when a detector's
    /// backing resource (pattern library, lexicon) cannot be loaded.
    pub fn from_config(config: &DetectionConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| GatewayError::Configuration(format!("{e:#}")))?;

        let mut detectors: Vec<Arc<dyn PiiDetector>> = Vec::new();

        if config.regex_enabled {
            let registry = match config.pattern_library {
                Some(ref path) => PatternRegistry::from_file(path),
                None => PatternRegistry::default_patterns(),
            }
            .map_err(|e| init_error("regex", e))?;

            detectors.push(Arc::new(
                RegexDetector::with_registry(registry)
                    .with_confidence_threshold(config.confidence_threshold),
            ));
        }

        if config.phone_enabled {
            let detector =
                PhoneDetector::with_digit_bounds(config.phone_min_digits, config.phone_max_digits)
                    .map_err(|e| init_error("phone", e))?;
            detectors.push(Arc::new(detector));
        }

        if config.national_id_enabled {
            let detector = NationalIdDetector::new().map_err(|e| init_error("national_id", e))?;
            detectors.push(Arc::new(detector));
        }

        if let Some(ref path) = config.entity_lexicon {
            let detector = EntityLexiconDetector::from_file(path)
                .map_err(|e| init_error("entity_lexicon", e))?;
            detectors.push(Arc::new(detector));
        }

        let engine = Self::new(detectors);
        tracing::info!(detectors = ?engine.detector_names(), "Anonymization engine assembled");

        Ok(engine)
    }

    /// Names of the configured detectors, in invocation order
    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run every detector and return the accepted, non-overlapping spans
    pub fn detect(&self, text: &str) -> Vec<DetectedSpan> {
        if text.is_empty() {
            return Vec::new();
        }

        let candidates: Vec<DetectedSpan> = self
            .detectors
            .iter()
            .flat_map(|detector| {
                let spans = detector.detect(text);
                tracing::trace!(detector = detector.name(), spans = spans.len(), "Detector finished");
                spans
            })
            .collect();

        resolve_overlaps(text, candidates)
    }

    /// Replace detected PII with placeholder tokens
    ///
    /// Total over all input: text that already contains token-shaped
    /// substrings is treated as ordinary text.
    pub fn anonymize(&self, text: &str) -> AnonymizedText {
        self.anonymize_with(text, &mut TokenGenerator::new())
    }

    /// Like [`anonymize`](Self::anonymize), drawing ids from `generator`
    pub fn anonymize_with(&self, text: &str, generator: &mut TokenGenerator) -> AnonymizedText {
        let accepted = self.detect(text);

        let mut mapping = RestorationMapping::new();
        let mut tokens_by_value: HashMap<&str, String> = HashMap::new();
        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;

        for span in &accepted {
            output.push_str(&text[cursor..span.start]);

            let token = match tokens_by_value.get(span.value.as_str()) {
                Some(token) => {
                    mapping.record_repeat(token);
                    token.clone()
                }
                None => {
                    let mut token = generator.generate(span.category);
                    while mapping.contains_token(&token) {
                        token = generator.generate(span.category);
                    }

                    mapping.insert(
                        token.clone(),
                        MappingEntry {
                            original_value: span.value.clone(),
                            category: span.category,
                            start: span.start,
                            end: span.end,
                            occurrences: 1,
                        },
                    );
                    tokens_by_value.insert(span.value.as_str(), token.clone());
                    token
                }
            };

            output.push_str(&token);
            cursor = span.end;
        }

        output.push_str(&text[cursor..]);

        tracing::debug!(
            detections = accepted.len(),
            tokens = mapping.len(),
            "Text anonymized"
        );

        AnonymizedText {
            text: output,
            mapping,
        }
    }

    /// Put original values back in place of this call's tokens
    ///
    /// Does not re-run detection and ignores tokens the mapping did not issue.
    pub fn restore(&self, text: &str, mapping: &RestorationMapping) -> String {
        mapping.restore(text)
    }
}

fn init_error(detector: &str, err: anyhow::Error) -> GatewayError {
    GatewayError::DetectorInitialization {
        detector: detector.to_string(),
        message: format!("{err:#}"),
    }
}
