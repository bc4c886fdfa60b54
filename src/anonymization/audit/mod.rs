//! Audit logging module
//!
//! Records what each flow call anonymized, as category counts and SHA-256
//! hashes of the original values.

pub mod logger;

pub use logger::{hash_pii_value, AuditLogger, AuditSummary};
