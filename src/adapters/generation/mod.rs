//! Text-generation service abstraction
//!
//! The gateway only ever sends anonymized text through a
//! [`GenerationProvider`]. Providers are built once from configuration and
//! shared by all requests.

pub mod echo;
pub mod gemini;

use crate::config::{GenerationConfig, RetryConfig};
use crate::domain::{GatewayError, GenerationError, Result};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub use echo::EchoProvider;
pub use gemini::GeminiProvider;

/// Out-of-band instruction sent alongside every anonymized prompt
pub const TOKEN_PRESERVATION_INSTRUCTION: &str = "IMPORTANT: You are part of a PII scrubbing system. \
User prompts may contain anonymized tokens like <PII:TYPE:ID>. \
You MUST preserve these tokens exactly in your response. \
Do not modify, rename, translate or obfuscate them.";

/// Result type for generation calls
pub type GenerationResult<T> = std::result::Result<T, GenerationError>;

/// Trait for external text-generation services
///
/// `generate` is the single suspension point of the round-trip flow.
/// Dropping the returned future cancels the call.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &'static str;

    /// Send an (already anonymized) prompt and return the reply text
    async fn generate(&self, prompt: &str) -> GenerationResult<String>;
}

/// Build the provider named in `config`
///
/// # Errors
///
/// Returns [`GatewayError::Configuration`] for an unknown provider or
/// missing provider settings.
pub fn create_provider(config: &GenerationConfig) -> Result<Arc<dyn GenerationProvider>> {
    match config.provider.as_str() {
        "echo" => Ok(Arc::new(EchoProvider::new(Duration::from_millis(
            config.echo_delay_ms,
        )))),
        "gemini" => Ok(Arc::new(GeminiProvider::new(config)?)),
        other => Err(GatewayError::Configuration(format!(
            "Unknown generation provider: {other}"
        ))),
    }
}

/// Run `operation`, retrying transient failures with exponential backoff
///
/// At most `retry.max_retries` retries follow the first attempt.
/// Non-transient errors are returned immediately.
pub async fn with_retry<F, T, Fut>(retry: &RetryConfig, operation: F) -> GenerationResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = GenerationResult<T>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !e.is_transient() || attempt >= retry.max_retries {
                    return Err(e);
                }

                attempt += 1;
                let delay_ms = retry.delay_for_attempt(attempt);

                crate::log_retry_attempt!(attempt, retry.max_retries, e.to_string().as_str());
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_retry(max_retries: usize) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_delay_ms: 1,
            max_delay_ms: 2,
            backoff_multiplier: 2.0,
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_error() {
        let calls = AtomicUsize::new(0);
        let result = with_retry(&fast_retry(2), || async {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(GenerationError::Timeout("slow".to_string()))
            } else {
                Ok("done")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_retries() {
        let calls = AtomicUsize::new(0);
        let result: GenerationResult<()> = with_retry(&fast_retry(2), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(GenerationError::ServerError {
                status: 503,
                message: "busy".to_string(),
            })
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: GenerationResult<()> = with_retry(&fast_retry(5), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(GenerationError::ClientError {
                status: 400,
                message: "bad request".to_string(),
            })
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_retries_by_default() {
        let calls = AtomicUsize::new(0);
        let result: GenerationResult<()> = with_retry(&RetryConfig::default(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(GenerationError::ConnectionFailed("refused".to_string()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_factory_builds_echo() {
        let provider = create_provider(&GenerationConfig::default()).unwrap();
        assert_eq!(provider.name(), "echo");
    }

    #[test]
    fn test_factory_rejects_unknown_provider() {
        let config = GenerationConfig {
            provider: "openai".to_string(),
            ..GenerationConfig::default()
        };
        assert!(matches!(
            create_provider(&config),
            Err(GatewayError::Configuration(_))
        ));
    }

    #[test]
    fn test_factory_requires_gemini_key() {
        let config = GenerationConfig {
            provider: "gemini".to_string(),
            ..GenerationConfig::default()
        };
        assert!(matches!(
            create_provider(&config),
            Err(GatewayError::Configuration(_))
        ));
    }
}
