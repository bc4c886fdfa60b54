//! Data models for detection and anonymization

pub mod pii_entity;

pub use pii_entity::{DetectedSpan, DetectionMethod, PiiCategory};
