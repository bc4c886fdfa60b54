//! JSON documents: every string value is a block
//!
//! Object keys are structure, not content, and are left alone. Numbers,
//! booleans and nulls pass through untouched.

use super::{BlockRedactor, DocumentProcessor};
use crate::domain::{GatewayError, Result};
use serde_json::Value;

/// Processor for `application/json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonProcessor;

impl JsonProcessor {
    /// Recursively redact string values in place
    fn traverse_json(value: &mut Value, redactor: &mut BlockRedactor<'_>) {
        match value {
            Value::String(s) => {
                *s = redactor.redact(s);
            }
            Value::Object(map) => {
                for (_, val) in map.iter_mut() {
                    Self::traverse_json(val, redactor);
                }
            }
            Value::Array(arr) => {
                for val in arr.iter_mut() {
                    Self::traverse_json(val, redactor);
                }
            }
            _ => {}
        }
    }
}

impl DocumentProcessor for JsonProcessor {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn process(&self, bytes: &[u8], redactor: &mut BlockRedactor<'_>) -> Result<Vec<u8>> {
        let mut document: Value = serde_json::from_slice(bytes)
            .map_err(|e| GatewayError::Validation(format!("Malformed JSON document: {e}")))?;

        Self::traverse_json(&mut document, redactor);

        let mut output = serde_json::to_vec_pretty(&document)?;
        output.push(b'\n');
        Ok(output)
    }
}
