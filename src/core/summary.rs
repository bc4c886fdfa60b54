//! Flow results and reporting
//!
//! Reports carry counts and categories only. The restoration mapping never
//! leaves the flow that created it.

use crate::anonymization::PiiCategory;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Result of the round-trip flow
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Reply with original values restored
    pub text: String,

    /// Distinct values replaced in the prompt
    pub tokens: usize,

    /// Token-shaped strings in the reply that this request never issued
    pub unknown_tokens: usize,

    /// Wall-clock duration of the call
    pub duration: Duration,
}

/// Result of the redact-only flow
///
/// Serializes to the `--json` output of the `anonymize` command.
#[derive(Debug, Clone, Serialize)]
pub struct RedactionReport {
    /// Anonymized text
    pub text: String,

    /// Distinct values replaced
    pub tokens: usize,

    /// Distinct values per category
    pub categories: BTreeMap<PiiCategory, usize>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

/// Result of the block-wise document flow
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// Redacted document bytes
    pub content: Vec<u8>,

    /// MIME type the document was processed as
    pub content_type: String,

    /// Non-blank blocks processed
    pub blocks: usize,

    /// Values replaced, summed over blocks
    pub detections: usize,

    /// Values per category, summed over blocks
    pub categories: BTreeMap<PiiCategory, usize>,

    /// Wall-clock duration of the call
    pub duration: Duration,
}

impl DocumentReport {
    /// Print a human-readable summary to stderr
    pub fn log_summary(&self) {
        eprintln!("\n📊 Document Summary");
        eprintln!("==================");
        eprintln!("Content type: {}", self.content_type);
        eprintln!("Blocks processed: {}", self.blocks);
        eprintln!("Values replaced: {}", self.detections);
        for (category, count) in &self.categories {
            eprintln!("  {}: {count}", category.label());
        }
        eprintln!("Duration: {:.2}s", self.duration.as_secs_f64());
    }
}
