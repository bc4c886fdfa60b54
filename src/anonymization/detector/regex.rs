//! Regex-based PII detector

use super::{patterns::PatternRegistry, PiiDetector};
use crate::anonymization::models::{DetectedSpan, DetectionMethod};
use anyhow::Result;
use std::sync::Arc;

/// Regex-based PII detector
///
/// Runs every pattern of its registry whose confidence meets the threshold.
pub struct RegexDetector {
    pattern_registry: Arc<PatternRegistry>,
    confidence_threshold: f32,
}

impl RegexDetector {
    /// Create a new regex detector with default patterns
    pub fn new() -> Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new regex detector with custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
            confidence_threshold: 0.7,
        }
    }

    /// Set the confidence threshold
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Get the confidence threshold for this detector
    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }
}

impl PiiDetector for RegexDetector {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn detect(&self, text: &str) -> Vec<DetectedSpan> {
        let mut spans = Vec::new();

        for pattern in self.pattern_registry.all_patterns() {
            if pattern.confidence < self.confidence_threshold {
                continue;
            }

            for matched in pattern.regex.find_iter(text) {
                spans.push(DetectedSpan::from_match(
                    pattern.category,
                    &matched,
                    DetectionMethod::Regex,
                ));
            }
        }

        spans
    }
}
