//! Core orchestration for the gateway.
//!
//! # Modules
//!
//! - [`gateway`] - the [`PiiGateway`] service and its three flows
//! - [`summary`] - per-call results and reporting
//!
//! # Flows
//!
//! 1. **Round trip** ([`PiiGateway::chat`]): anonymize the prompt, send it to
//!    the generation service, restore original values in the reply
//! 2. **Redact only** ([`PiiGateway::anonymize`]): anonymize and return the
//!    substituted text
//! 3. **Documents** ([`PiiGateway::anonymize_document`]): anonymize every
//!    block of a document independently, keeping the tokens
//!
//! # Example
//!
//! ```rust,no_run
//! use pii_gateway::config::load_config;
//! use pii_gateway::core::PiiGateway;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pii-gateway.toml")?;
//! let gateway = PiiGateway::from_config(&config)?;
//!
//! let reply = gateway.chat("Write a short note to jan.kowalski@example.com").await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub mod gateway;
pub mod summary;

pub use gateway::PiiGateway;
pub use summary::{ChatReply, DocumentReport, RedactionReport};
