//! Result type alias for the gateway

use super::errors::GatewayError;

/// Result type alias for gateway operations
///
/// # Examples
///
/// ```
/// use pii_gateway::domain::result::Result;
/// use pii_gateway::domain::errors::GatewayError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(GatewayError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, GatewayError>;
