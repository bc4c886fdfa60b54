//! Logging and observability
//!
//! Structured logging through `tracing`. Every flow call runs inside a span
//! carrying its `request_id`; field values never contain plaintext PII.
//!
//! # Example
//!
//! ```no_run
//! use pii_gateway::logging::init_logging;
//! use pii_gateway::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Gateway started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a flow call
///
/// # Example
///
/// ```no_run
/// use pii_gateway::log_flow_start;
///
/// log_flow_start!("chat", 42);
/// ```
#[macro_export]
macro_rules! log_flow_start {
    ($flow:expr, $input_bytes:expr) => {
        tracing::info!(flow = $flow, input_bytes = $input_bytes, "Starting flow");
    };
}

/// Log the completion of a flow call
///
/// # Example
///
/// ```no_run
/// use pii_gateway::log_flow_complete;
/// use std::time::Duration;
///
/// log_flow_complete!("redact", 3, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_flow_complete {
    ($flow:expr, $tokens:expr, $duration:expr) => {
        tracing::info!(
            flow = $flow,
            tokens = $tokens,
            duration_ms = $duration.as_millis() as u64,
            "Flow completed"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use pii_gateway::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = $reason,
            "Retrying operation"
        );
    };
}
