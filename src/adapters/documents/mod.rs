//! Document processors for block-wise redaction
//!
//! A processor splits a document into text-bearing blocks (paragraphs,
//! cells, string values), hands each block to a [`BlockRedactor`] and
//! reassembles the document. Every block is anonymized by its own engine
//! call, so the same value in two blocks gets two different tokens, and
//! the output keeps its tokens (there is no restore step).
//!
//! Processors are selected by MIME type through a
//! [`DocumentProcessorRegistry`].

pub mod csv;
pub mod json;
pub mod plain_text;

use crate::anonymization::audit::AuditSummary;
use crate::anonymization::AnonymizationEngine;
use crate::domain::{GatewayError, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub use self::csv::CsvProcessor;
pub use self::json::JsonProcessor;
pub use self::plain_text::PlainTextProcessor;

/// Trait for content-type specific document processors
pub trait DocumentProcessor: Send + Sync {
    /// MIME type handled by this processor
    fn content_type(&self) -> &'static str;

    /// Redact every text block of `bytes` and return the rebuilt document
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] when the bytes are not a
    /// well-formed document of this type.
    fn process(&self, bytes: &[u8], redactor: &mut BlockRedactor<'_>) -> Result<Vec<u8>>;
}

/// Anonymizes document blocks one engine call at a time
///
/// Keeps hashed audit data and a block count; mappings are dropped as
/// soon as each block is rewritten.
pub struct BlockRedactor<'a> {
    engine: &'a AnonymizationEngine,
    summary: AuditSummary,
    blocks: usize,
}

impl<'a> BlockRedactor<'a> {
    /// Create a redactor over `engine`
    pub fn new(engine: &'a AnonymizationEngine) -> Self {
        Self {
            engine,
            summary: AuditSummary::new(),
            blocks: 0,
        }
    }

    /// Anonymize one block; whitespace-only blocks are returned unchanged
    pub fn redact(&mut self, block: &str) -> String {
        if block.trim().is_empty() {
            return block.to_string();
        }

        let anonymized = self.engine.anonymize(block);
        self.summary.add_mapping(&anonymized.mapping);
        self.blocks += 1;
        anonymized.text
    }

    /// Number of non-blank blocks processed
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Hashed record of everything replaced
    pub fn into_summary(self) -> AuditSummary {
        self.summary
    }
}

/// Registry of document processors keyed by MIME type
pub struct DocumentProcessorRegistry {
    processors: BTreeMap<&'static str, Arc<dyn DocumentProcessor>>,
}

impl DocumentProcessorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            processors: BTreeMap::new(),
        }
    }

    /// Registry with the built-in plain text, CSV and JSON processors
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PlainTextProcessor));
        registry.register(Arc::new(CsvProcessor));
        registry.register(Arc::new(JsonProcessor));
        registry
    }

    /// Add or replace the processor for its content type
    pub fn register(&mut self, processor: Arc<dyn DocumentProcessor>) {
        self.processors.insert(processor.content_type(), processor);
    }

    /// Registered MIME types, sorted
    pub fn supported_types(&self) -> Vec<&'static str> {
        self.processors.keys().copied().collect()
    }

    /// Look up the processor for `content_type`
    ///
    /// Parameters such as `; charset=utf-8` and letter case are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnsupportedContentType`] when nothing is
    /// registered for the type.
    pub fn get(&self, content_type: &str) -> Result<Arc<dyn DocumentProcessor>> {
        let normalized = normalize_content_type(content_type);
        self.processors
            .get(normalized.as_str())
            .cloned()
            .ok_or_else(|| GatewayError::UnsupportedContentType {
                content_type: content_type.to_string(),
                supported: self.supported_types().join(", "),
            })
    }
}

impl Default for DocumentProcessorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Guess a MIME type from a file extension
pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "txt" | "text" | "md" | "log" => Some("text/plain"),
        "csv" => Some("text/csv"),
        "json" => Some("application/json"),
        _ => None,
    }
}

/// Decode document bytes as UTF-8 or fail validation
pub(crate) fn decode_utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| GatewayError::Validation(format!("Document is not valid UTF-8: {e}")))
}
