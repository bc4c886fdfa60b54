//! Domain error types
//!
//! This module defines the error hierarchy for the gateway. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main gateway error type
///
/// The variants follow the gateway's error taxonomy. Caller errors
/// ([`Validation`](Self::Validation), [`UnsupportedContentType`](Self::UnsupportedContentType))
/// carry enough detail to correct the request. Internal and external-service
/// errors keep their detail for the diagnostic channel only; use
/// [`public_message`](Self::public_message) when rendering across a boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A detector's backing resource could not be loaded (fatal, at assembly time)
    #[error("Detector initialization failed ({detector}): {message}")]
    DetectorInitialization {
        /// Name of the detector that failed
        detector: String,
        /// Failure detail
        message: String,
    },

    /// No document processor is registered for the content type
    #[error("Unsupported content type: {content_type}. Supported types: {supported}")]
    UnsupportedContentType {
        /// Content type that was requested
        content_type: String,
        /// Comma-separated list of registered content types
        supported: String,
    },

    /// Malformed request
    #[error("Validation error: {0}")]
    Validation(String),

    /// The external generation service failed or returned an error
    #[error("External service error: {0}")]
    ExternalService(#[from] GenerationError),

    /// Unexpected failure inside the gateway
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Render the error for callers on the other side of a boundary
    ///
    /// Caller errors are returned verbatim. Internal and external-service
    /// failures collapse to a generic message; their detail only goes to
    /// the tracing diagnostic channel.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(_) | Self::UnsupportedContentType { .. } => self.to_string(),
            Self::ExternalService(_) => {
                "The text generation service is unavailable. Please try again later.".to_string()
            }
            Self::DetectorInitialization { .. } | Self::Internal(_) | Self::Configuration(_) => {
                "An internal error occurred while processing the request.".to_string()
            }
        }
    }

    /// Whether the error was caused by the caller's request
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UnsupportedContentType { .. }
        )
    }
}

/// Generation-service specific errors
///
/// Errors that occur when calling the external text-generation service.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Failed to connect to the service
    #[error("Failed to connect to generation service: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Rate limit exceeded (429)
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Response could not be interpreted
    #[error("Invalid response from generation service: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    /// Whether a retry could succeed
    ///
    /// Only connection failures, timeouts, throttling and 5xx responses are
    /// transient. Client errors and malformed responses are not retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::Timeout(_)
                | Self::RateLimited(_)
                | Self::ServerError { .. }
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Internal(format!("I/O error: {err}"))
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Internal(format!("Serialization error: {err}"))
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for GatewayError {
    fn from(err: toml::de::Error) -> Self {
        GatewayError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Blocking detection work runs on tokio's worker pool
impl From<tokio::task::JoinError> for GatewayError {
    fn from(err: tokio::task::JoinError) -> Self {
        GatewayError::Internal(format!("Worker task failed: {err}"))
    }
}
