//! Google Gemini provider
//!
//! Calls the `models/{model}:generateContent` REST endpoint. The token
//! preservation instruction travels as `systemInstruction`, separate from
//! the user content.

use super::{with_retry, GenerationProvider, GenerationResult, TOKEN_PRESERVATION_INSTRUCTION};
use crate::config::{GenerationConfig, RetryConfig, SecretString};
use crate::domain::{GatewayError, GenerationError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini REST client
pub struct GeminiProvider {
    client: Client,
    endpoint: String,
    api_key: SecretString,
    retry: RetryConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiProvider {
    /// Create a Gemini provider from the generation settings
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the API key is missing or
    /// the HTTP client cannot be built.
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let api_key = match config.api_key {
            Some(ref key) if !key.expose_secret().is_empty() => key.clone(),
            _ => {
                return Err(GatewayError::Configuration(
                    "Gemini provider requires generation.api_key".to_string(),
                ))
            }
        };

        if config.model.trim().is_empty() {
            return Err(GatewayError::Configuration(
                "Gemini provider requires generation.model".to_string(),
            ));
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            endpoint,
            api_key,
            retry: config.retry.clone(),
        })
    }

    async fn send_once(&self, body: &GenerateContentRequest<'_>) -> GenerationResult<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.expose_secret().as_ref())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(e.to_string())
                } else {
                    GenerationError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(status_error(status, message));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        extract_text(parsed)
    }
}

fn status_error(status: StatusCode, message: String) -> GenerationError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        GenerationError::RateLimited(message)
    } else if status.is_server_error() {
        GenerationError::ServerError {
            status: status.as_u16(),
            message,
        }
    } else {
        GenerationError::ClientError {
            status: status.as_u16(),
            message,
        }
    }
}

fn extract_text(response: GenerateContentResponse) -> GenerationResult<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(GenerationError::InvalidResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(GenerationError::InvalidResponse(
            "candidate contained no text".to_string(),
        ));
    }

    Ok(text)
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: TOKEN_PRESERVATION_INSTRUCTION,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
        };

        with_retry(&self.retry, || self.send_once(&body)).await
    }
}
