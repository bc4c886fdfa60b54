//! Plain text documents
//!
//! Paragraphs are separated by one or more blank lines. Separators are
//! copied through byte for byte, so line endings and indentation of blank
//! lines survive redaction.

use super::{decode_utf8, BlockRedactor, DocumentProcessor};
use crate::domain::Result;
use regex::Regex;
use std::sync::OnceLock;

/// Processor for `text/plain`
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextProcessor;

fn paragraph_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| {
        Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").expect("paragraph separator should compile")
    })
}

impl DocumentProcessor for PlainTextProcessor {
    fn content_type(&self) -> &'static str {
        "text/plain"
    }

    fn process(&self, bytes: &[u8], redactor: &mut BlockRedactor<'_>) -> Result<Vec<u8>> {
        let text = decode_utf8(bytes)?;
        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;

        for separator in paragraph_separator().find_iter(text) {
            output.push_str(&redactor.redact(&text[cursor..separator.start()]));
            output.push_str(separator.as_str());
            cursor = separator.end();
        }
        output.push_str(&redactor.redact(&text[cursor..]));

        Ok(output.into_bytes())
    }
}
