// PII Gateway - anonymizing proxy for LLM text generation
// Copyright (c) 2025 PII Gateway Contributors
// Licensed under the MIT License

//! # PII Gateway
//!
//! PII Gateway sits between a caller and an external text-generation service.
//! Personal data in a prompt is replaced by opaque tokens before the prompt
//! leaves the process, and the original values are put back into the reply.
//!
//! ## Overview
//!
//! This library provides:
//! - **Detecting** emails, phone numbers, bank accounts, dates, PESEL numbers
//!   and lexicon entities (people, places, organizations)
//! - **Anonymizing** text with `<PII:CATEGORY:xxxxxxxx>` tokens and a
//!   per-request restoration mapping
//! - **Restoring** original values in the generated reply
//! - **Redacting** plain text, CSV and JSON documents block by block
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Flow orchestration ([`core::PiiGateway`])
//! - [`anonymization`] - Detectors, overlap resolution, tokens, restore
//! - [`adapters`] - External integrations (generation services, document formats)
//! - [`domain`] - Error taxonomy and result type
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pii_gateway::config::load_config;
//! use pii_gateway::core::PiiGateway;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("pii-gateway.toml")?;
//!     let gateway = PiiGateway::from_config(&config)?;
//!
//!     let reply = gateway
//!         .chat("Draft a reply to jan.kowalski@example.com, phone 601 234 567")
//!         .await?;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Anonymize and Restore
//!
//! The engine is a plain library call. Anonymize and restore never fail:
//!
//! ```rust
//! use pii_gateway::anonymization::{AnonymizationEngine, DetectionConfig};
//!
//! # fn main() -> pii_gateway::domain::Result<()> {
//! let engine = AnonymizationEngine::from_config(&DetectionConfig::default())?;
//!
//! let anonymized = engine.anonymize("Call 123-456-7890 or email foo@bar.com");
//! assert_eq!(anonymized.mapping.len(), 2);
//! assert!(!anonymized.text.contains("foo@bar.com"));
//!
//! let restored = engine.restore(&anonymized.text, &anonymized.mapping);
//! assert_eq!(restored, "Call 123-456-7890 or email foo@bar.com");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::GatewayError`]. Use
//! [`domain::GatewayError::public_message`] when an error crosses a trust
//! boundary:
//!
//! ```rust,no_run
//! use pii_gateway::domain::GatewayError;
//!
//! fn render(err: &GatewayError) -> String {
//!     err.public_message()
//! }
//! ```
//!
//! ## Logging
//!
//! Structured logging uses the `tracing` crate. Every flow call runs in a
//! span carrying its `request_id`; plaintext PII is never logged:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(flow = "chat", tokens = 2, "Flow completed");
//! warn!(unknown_tokens = 1, "Reply contains foreign tokens");
//! ```

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
