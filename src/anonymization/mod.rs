//! PII anonymization and restoration
//!
//! This module detects PII in free text, swaps it for opaque placeholder
//! tokens and restores the original values afterwards.
//!
//! # Architecture
//!
//! - **Detection**: independent [`detector::PiiDetector`] strategies
//!   (pattern library, phone numbers, PESEL, entity lexicon)
//! - **Resolution**: deterministic overlap resolution across all detectors
//! - **Tokenization**: `<PII:{LABEL}:{id}>` placeholders, one per distinct value
//! - **Restoration**: literal token replacement driven by a per-call mapping
//! - **Audit**: JSON-lines trail with hashed PII values
//!
//! # Usage
//!
//! ```rust,ignore
//! use pii_gateway::anonymization::{AnonymizationEngine, DetectionConfig};
//!
//! let engine = AnonymizationEngine::from_config(&DetectionConfig::default())?;
//! let anonymized = engine.anonymize("Call 123-456-7890");
//! let reply = engine.restore(&anonymized.text, &anonymized.mapping);
//! ```

pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod mapping;
pub mod models;
pub mod resolver;
pub mod tokenization;

// Re-export main types
pub use config::{AuditConfig, DetectionConfig};
pub use engine::{AnonymizationEngine, AnonymizedText};
pub use mapping::{MappingEntry, RestorationMapping};
pub use models::{DetectedSpan, DetectionMethod, PiiCategory};
