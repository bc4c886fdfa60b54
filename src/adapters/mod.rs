//! External system integrations.
//!
//! - [`generation`] - text-generation services (echo mock, Gemini)
//! - [`documents`] - content-type specific document processors
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with mock implementations. Both layers are trait-based
//! ([`generation::GenerationProvider`], [`documents::DocumentProcessor`]) and
//! selected from configuration or content type at runtime.
//!
//! ```rust,no_run
//! use pii_gateway::adapters::generation::create_provider;
//! use pii_gateway::config::GenerationConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = create_provider(&GenerationConfig::default())?;
//! let reply = provider.generate("Hello <PII:EMAIL:0badc0de>").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

pub mod documents;
pub mod generation;
