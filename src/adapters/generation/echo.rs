//! Echo provider for local runs and tests

use super::{GenerationProvider, GenerationResult};
use async_trait::async_trait;
use std::time::Duration;

/// Mock provider that replies with the prompt it was given
///
/// Tokens in the prompt come back verbatim, which makes the round trip
/// observable without a network dependency.
#[derive(Debug, Clone, Default)]
pub struct EchoProvider {
    delay: Duration,
}

impl EchoProvider {
    /// Create an echo provider with a simulated latency
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl GenerationProvider for EchoProvider {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(format!("LLM response to: {prompt}"))
    }
}
