//! CSV documents: every cell is a block

use super::{BlockRedactor, DocumentProcessor};
use crate::domain::{GatewayError, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};

/// Processor for `text/csv`
///
/// Rows may have differing lengths. The header row, when present, is
/// treated like any other row.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvProcessor;

impl DocumentProcessor for CsvProcessor {
    fn content_type(&self) -> &'static str {
        "text/csv"
    }

    fn process(&self, bytes: &[u8], redactor: &mut BlockRedactor<'_>) -> Result<Vec<u8>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);
        let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                GatewayError::Validation(format!("Malformed CSV at record {}: {e}", index + 1))
            })?;

            let redacted: StringRecord = record.iter().map(|cell| redactor.redact(cell)).collect();
            writer
                .write_record(&redacted)
                .map_err(|e| GatewayError::Internal(format!("Failed to write CSV record: {e}")))?;
        }

        writer
            .into_inner()
            .map_err(|e| GatewayError::Internal(format!("Failed to flush CSV output: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::detector::RegexDetector;
    use crate::anonymization::tokenization::is_token;
    use crate::anonymization::AnonymizationEngine;
    use std::sync::Arc;

    fn engine() -> AnonymizationEngine {
        AnonymizationEngine::new(vec![Arc::new(RegexDetector::new().unwrap())])
    }

    #[test]
    fn test_cells_redacted() {
        let engine = engine();
        let mut redactor = BlockRedactor::new(&engine);
        let input = "name,email\nJan,jan@example.com\nAnna,anna@example.com\n";

        let output = CsvProcessor.process(input.as_bytes(), &mut redactor).unwrap();

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(output.as_slice());
        let emails: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[1].to_string())
            .collect();
        assert_eq!(emails.len(), 2);
        assert!(emails.iter().all(|e| is_token(e)));
        assert_eq!(redactor.blocks(), 6);
    }

    #[test]
    fn test_same_value_in_two_cells_gets_two_tokens() {
        let engine = engine();
        let mut redactor = BlockRedactor::new(&engine);

        let output = CsvProcessor
            .process(b"a@b.com,a@b.com\n", &mut redactor)
            .unwrap();
        let text = String::from_utf8(output).unwrap();
        let cells: Vec<&str> = text.trim_end().split(',').collect();
        assert_eq!(cells.len(), 2);
        assert_ne!(cells[0], cells[1]);
    }

    #[test]
    fn test_ragged_rows_accepted() {
        let engine = engine();
        let mut redactor = BlockRedactor::new(&engine);
        let output = CsvProcessor
            .process(b"a,b,c\nd\n", &mut redactor)
            .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "a,b,c\nd\n");
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let engine = engine();
        let mut redactor = BlockRedactor::new(&engine);
        let result = CsvProcessor.process(&[b'a', b',', 0xff, b'\n'], &mut redactor);
        assert!(matches!(result, Err(GatewayError::Validation(_))));
    }
}
