//! Domain types shared across the gateway.
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, GatewayError>`]:
//!
//! ```rust
//! use pii_gateway::domain::{GatewayError, Result};
//!
//! fn check_prompt(prompt: &str) -> Result<()> {
//!     if prompt.trim().is_empty() {
//!         return Err(GatewayError::Validation("prompt cannot be empty".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::{GatewayError, GenerationError};
pub use result::Result;
