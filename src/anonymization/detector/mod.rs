//! PII detection module
//!
//! Provides the trait-based detection interface and the built-in
//! detection strategies. Strategies are independent of one another; the
//! engine aggregates their output and resolves overlaps.

pub mod lexicon;
pub mod national_id;
pub mod patterns;
pub mod phone;
pub mod regex;

use crate::anonymization::models::DetectedSpan;

pub use self::lexicon::EntityLexiconDetector;
pub use self::national_id::NationalIdDetector;
pub use self::phone::PhoneDetector;
pub use self::regex::RegexDetector;

/// Trait for PII detection implementations
///
/// Implementations are built once and shared across concurrent requests,
/// so `detect` takes `&self` and must not mutate visible state. Detectors
/// backed by a resource that is not safe for concurrent reads serialize
/// access internally.
pub trait PiiDetector: Send + Sync {
    /// Short, stable name used in logs and errors
    fn name(&self) -> &'static str;

    /// Scan `text` and return the spans found, in any order
    fn detect(&self, text: &str) -> Vec<DetectedSpan>;
}
