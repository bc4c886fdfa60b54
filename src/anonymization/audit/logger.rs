//! Audit logger for anonymization calls

use crate::anonymization::mapping::RestorationMapping;
use crate::anonymization::models::PiiCategory;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Hash a PII value using SHA-256
pub fn hash_pii_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}

/// Hashed detection record (never holds plaintext)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditDetection {
    category: PiiCategory,
    value_hash: String,
    occurrences: usize,
}

/// What one flow call detected, reduced to hashes and counts
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditSummary {
    counts: BTreeMap<PiiCategory, usize>,
    detections: Vec<AuditDetection>,
}

impl AuditSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in the entries of one restoration mapping
    pub fn add_mapping(&mut self, mapping: &RestorationMapping) {
        for (_, entry) in mapping.iter() {
            *self.counts.entry(entry.category).or_insert(0) += 1;
            self.detections.push(AuditDetection {
                category: entry.category,
                value_hash: hash_pii_value(&entry.original_value),
                occurrences: entry.occurrences,
            });
        }
    }

    /// Distinct values per category
    pub fn counts(&self) -> &BTreeMap<PiiCategory, usize> {
        &self.counts
    }

    /// Total distinct values
    pub fn total(&self) -> usize {
        self.detections.len()
    }
}

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry<'a> {
    timestamp: String,
    request_id: &'a str,
    flow: &'a str,
    detections_count: usize,
    processing_time_ms: u64,
    #[serde(flatten)]
    summary: &'a AuditSummary,
}

/// Append-only JSON-lines audit trail
pub struct AuditLogger {
    log_path: PathBuf,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new audit logger, creating the parent directory if needed
    pub fn new(log_path: PathBuf) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the audit file
    pub fn log_path(&self) -> &PathBuf {
        &self.log_path
    }

    /// Record one completed flow call
    pub fn log_call(
        &self,
        request_id: &str,
        flow: &str,
        summary: &AuditSummary,
        processing_time_ms: u64,
    ) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            request_id,
            flow,
            detections_count: summary.total(),
            processing_time_ms,
            summary,
        };

        let json_line = serde_json::to_string(&entry).context("Failed to serialize audit entry")?;

        // Concurrent requests share the file; keep lines whole
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Audit log lock poisoned"))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        writeln!(file, "{json_line}").context("Failed to write audit entry")?;

        Ok(())
    }
}
