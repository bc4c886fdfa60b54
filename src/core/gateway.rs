//! Gateway service - orchestrates the anonymization flows
//!
//! Each flow call gets a fresh `request_id`, runs detection on the blocking
//! pool and owns its restoration mapping until it returns.

use crate::adapters::documents::{BlockRedactor, DocumentProcessorRegistry};
use crate::adapters::generation::{create_provider, GenerationProvider};
use crate::anonymization::audit::{AuditLogger, AuditSummary};
use crate::anonymization::tokenization::token_pattern;
use crate::anonymization::{AnonymizationEngine, AnonymizedText, RestorationMapping};
use crate::config::GatewayConfig;
use crate::core::summary::{ChatReply, DocumentReport, RedactionReport};
use crate::domain::{GatewayError, GenerationError, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// PII gateway service
///
/// Holds the long-lived, read-only pieces (engine, provider, document
/// processors, audit trail). Share across tasks as `Arc<PiiGateway>`.
pub struct PiiGateway {
    engine: Arc<AnonymizationEngine>,
    provider: Arc<dyn GenerationProvider>,
    documents: Arc<DocumentProcessorRegistry>,
    audit: Option<Arc<AuditLogger>>,
    request_timeout: Duration,
    max_document_bytes: usize,
}

impl PiiGateway {
    /// Create a gateway with default document processors and limits
    pub fn new(engine: Arc<AnonymizationEngine>, provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            engine,
            provider,
            documents: Arc::new(DocumentProcessorRegistry::with_defaults()),
            audit: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }

    /// Assemble the gateway from configuration
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] for invalid settings and
    /// [`GatewayError::DetectorInitialization`] when a detector cannot load
    /// its resources.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        config.validate().map_err(GatewayError::Configuration)?;

        let engine = AnonymizationEngine::from_config(&config.detection)?;
        let provider = create_provider(&config.generation)?;

        let mut gateway = Self::new(Arc::new(engine), provider)
            .with_request_timeout(Duration::from_secs(
                config.application.request_timeout_seconds,
            ))
            .with_max_document_bytes(config.documents.max_document_bytes);

        if config.detection.audit.enabled {
            let logger = AuditLogger::new(config.detection.audit.log_path.clone())
                .map_err(|e| GatewayError::Configuration(format!("{e:#}")))?;
            tracing::info!(path = %logger.log_path().display(), "Audit trail enabled");
            gateway = gateway.with_audit_logger(Arc::new(logger));
        }

        tracing::info!(
            provider = gateway.provider.name(),
            timeout_secs = gateway.request_timeout.as_secs(),
            "Gateway initialized"
        );

        Ok(gateway)
    }

    /// Replace the document processor registry
    pub fn with_documents(mut self, documents: DocumentProcessorRegistry) -> Self {
        self.documents = Arc::new(documents);
        self
    }

    /// Write a hashed audit entry for every flow call
    pub fn with_audit_logger(mut self, logger: Arc<AuditLogger>) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Bound the generation call
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reject larger documents
    pub fn with_max_document_bytes(mut self, max: usize) -> Self {
        self.max_document_bytes = max;
        self
    }

    /// The shared anonymization engine
    pub fn engine(&self) -> &AnonymizationEngine {
        &self.engine
    }

    /// Name of the configured generation provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// MIME types accepted by [`anonymize_document`](Self::anonymize_document)
    pub fn supported_content_types(&self) -> Vec<&'static str> {
        self.documents.supported_types()
    }

    /// Round-trip flow: anonymize, generate, restore
    ///
    /// The external service only ever sees the anonymized prompt. The
    /// mapping is dropped when this call returns or is cancelled.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Validation`] for an empty prompt
    /// - [`GatewayError::ExternalService`] when generation fails or times out
    /// - [`GatewayError::Internal`] if the detection worker fails
    pub async fn chat(&self, prompt: &str) -> Result<ChatReply> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("flow", request_id = %request_id, flow = "chat");
        self.run_chat(&request_id, prompt).instrument(span).await
    }

    /// Redact-only flow
    ///
    /// Accepts any text, including empty. Only the substituted text and
    /// category counts leave this call.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the detection worker fails.
    pub async fn anonymize(&self, text: &str) -> Result<RedactionReport> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("flow", request_id = %request_id, flow = "redact");
        self.run_redact(&request_id, text).instrument(span).await
    }

    /// Block-wise document flow
    ///
    /// Every text-bearing block is anonymized on its own; the result keeps
    /// its tokens.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::UnsupportedContentType`] before any processing
    ///   when no processor is registered for `content_type`
    /// - [`GatewayError::Validation`] for oversized or malformed documents
    /// - [`GatewayError::Internal`] if the processing worker fails
    pub async fn anonymize_document(
        &self,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<DocumentReport> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!(
            "flow",
            request_id = %request_id,
            flow = "document",
            content_type = %content_type
        );
        self.run_document(&request_id, content, content_type)
            .instrument(span)
            .await
    }

    async fn run_chat(&self, request_id: &str, prompt: &str) -> Result<ChatReply> {
        if prompt.trim().is_empty() {
            return Err(GatewayError::Validation(
                "Prompt cannot be empty".to_string(),
            ));
        }

        let start = Instant::now();
        crate::log_flow_start!("chat", prompt.len());

        let AnonymizedText { text, mapping } = self.anonymize_blocking(prompt).await?;
        tracing::debug!(detections = mapping.len(), "Prompt anonymized");

        let reply = self.generate(&text).await?;

        let unknown_tokens = count_unknown_tokens(&reply, &mapping);
        if unknown_tokens > 0 {
            tracing::warn!(
                unknown_tokens,
                "Reply contains token-shaped text not issued for this request; left as is"
            );
        }

        let restored = self.engine.restore(&reply, &mapping);

        let mut summary = AuditSummary::new();
        summary.add_mapping(&mapping);
        self.record_audit(request_id, "chat", summary, start.elapsed()).await;
        crate::log_flow_complete!("chat", mapping.len(), start.elapsed());

        Ok(ChatReply {
            text: restored,
            tokens: mapping.len(),
            unknown_tokens,
            duration: start.elapsed(),
        })
    }

    async fn run_redact(&self, request_id: &str, text: &str) -> Result<RedactionReport> {
        let start = Instant::now();
        crate::log_flow_start!("redact", text.len());

        let anonymized = self.anonymize_blocking(text).await?;

        let mut summary = AuditSummary::new();
        summary.add_mapping(&anonymized.mapping);
        self.record_audit(request_id, "redact", summary, start.elapsed()).await;
        crate::log_flow_complete!("redact", anonymized.mapping.len(), start.elapsed());

        Ok(RedactionReport {
            tokens: anonymized.mapping.len(),
            categories: anonymized.mapping.counts_by_category(),
            text: anonymized.text,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn run_document(
        &self,
        request_id: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<DocumentReport> {
        let processor = self.documents.get(content_type)?;
        let resolved_type = processor.content_type();

        if content.len() > self.max_document_bytes {
            return Err(GatewayError::Validation(format!(
                "Document is {} bytes, limit is {}",
                content.len(),
                self.max_document_bytes
            )));
        }

        let start = Instant::now();
        crate::log_flow_start!("document", content.len());

        let engine = Arc::clone(&self.engine);
        let (output, blocks, summary) = tokio::task::spawn_blocking(move || {
            let mut redactor = BlockRedactor::new(&engine);
            let output = processor.process(&content, &mut redactor)?;
            let blocks = redactor.blocks();
            Ok::<_, GatewayError>((output, blocks, redactor.into_summary()))
        })
        .await??;

        let detections = summary.total();
        let categories = summary.counts().clone();
        tracing::debug!(blocks, detections, "Document processed");
        self.record_audit(request_id, "document", summary, start.elapsed()).await;
        crate::log_flow_complete!("document", detections, start.elapsed());

        Ok(DocumentReport {
            content: output,
            content_type: resolved_type.to_string(),
            blocks,
            detections,
            categories,
            duration: start.elapsed(),
        })
    }

    /// Run detection and substitution on the blocking pool
    async fn anonymize_blocking(&self, text: &str) -> Result<AnonymizedText> {
        let engine = Arc::clone(&self.engine);
        let text = text.to_string();
        let anonymized = tokio::task::spawn_blocking(move || engine.anonymize(&text)).await?;
        Ok(anonymized)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let result = tokio::time::timeout(self.request_timeout, self.provider.generate(prompt))
            .await
            .unwrap_or_else(|_| {
                Err(GenerationError::Timeout(format!(
                    "no reply within {}s",
                    self.request_timeout.as_secs_f64()
                )))
            });

        result.map_err(|e| {
            tracing::error!(provider = self.provider.name(), error = %e, "Generation failed");
            GatewayError::ExternalService(e)
        })
    }

    /// File writes run on the blocking pool; the entry is on disk when this
    /// returns
    async fn record_audit(
        &self,
        request_id: &str,
        flow: &'static str,
        summary: AuditSummary,
        elapsed: Duration,
    ) {
        let Some(ref logger) = self.audit else {
            return;
        };

        let logger = Arc::clone(logger);
        let request_id = request_id.to_string();
        let written = tokio::task::spawn_blocking(move || {
            logger.log_call(&request_id, flow, &summary, elapsed.as_millis() as u64)
        })
        .await;

        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Failed to write audit entry"),
            Err(e) => tracing::warn!(error = %e, "Audit write task failed"),
        }
    }
}

fn count_unknown_tokens(reply: &str, mapping: &RestorationMapping) -> usize {
    token_pattern()
        .find_iter(reply)
        .filter(|m| !mapping.contains_token(m.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::generation::{EchoProvider, GenerationResult};
    use crate::anonymization::detector::{PhoneDetector, RegexDetector};
    use crate::anonymization::PiiCategory;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FailingProvider;

    #[async_trait]
    impl GenerationProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate(&self, _prompt: &str) -> GenerationResult<String> {
            Err(GenerationError::ServerError {
                status: 503,
                message: "overloaded".to_string(),
            })
        }
    }

    /// Replies with a fixed string, ignoring the prompt
    struct CannedProvider(&'static str);

    #[async_trait]
    impl GenerationProvider for CannedProvider {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn generate(&self, _prompt: &str) -> GenerationResult<String> {
            Ok(self.0.to_string())
        }
    }

    fn engine() -> Arc<AnonymizationEngine> {
        Arc::new(AnonymizationEngine::new(vec![
            Arc::new(RegexDetector::new().unwrap()),
            Arc::new(PhoneDetector::new().unwrap()),
        ]))
    }

    fn gateway(provider: Arc<dyn GenerationProvider>) -> PiiGateway {
        PiiGateway::new(engine(), provider)
    }

    #[tokio::test]
    async fn test_chat_round_trip_restores_values() {
        let gateway = gateway(Arc::new(EchoProvider::default()));
        let reply = gateway
            .chat("Call 123-456-7890 or email foo@bar.com")
            .await
            .unwrap();

        assert_eq!(
            reply.text,
            "LLM response to: Call 123-456-7890 or email foo@bar.com"
        );
        assert_eq!(reply.tokens, 2);
        assert_eq!(reply.unknown_tokens, 0);
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_prompt() {
        let gateway = gateway(Arc::new(EchoProvider::default()));
        let err = gateway.chat("   \n").await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
        assert!(err.is_caller_error());
    }

    #[tokio::test]
    async fn test_chat_external_failure() {
        let gateway = gateway(Arc::new(FailingProvider));
        let err = gateway.chat("hello a@b.com").await.unwrap_err();
        assert!(matches!(err, GatewayError::ExternalService(_)));
        assert!(!err.public_message().contains("overloaded"));
    }

    #[tokio::test]
    async fn test_chat_timeout() {
        let gateway = gateway(Arc::new(EchoProvider::new(Duration::from_millis(200))))
            .with_request_timeout(Duration::from_millis(10));
        let err = gateway.chat("hello").await.unwrap_err();
        assert!(matches!(
            err,
            GatewayError::ExternalService(GenerationError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_chat_leaves_foreign_tokens() {
        let gateway = gateway(Arc::new(CannedProvider("See <PII:EMAIL:deadbeef>")));
        let reply = gateway.chat("hi a@b.com").await.unwrap();
        assert_eq!(reply.text, "See <PII:EMAIL:deadbeef>");
        assert_eq!(reply.unknown_tokens, 1);
    }

    #[tokio::test]
    async fn test_anonymize_accepts_empty_text() {
        let gateway = gateway(Arc::new(EchoProvider::default()));
        let report = gateway.anonymize("").await.unwrap();
        assert_eq!(report.text, "");
        assert_eq!(report.tokens, 0);
    }

    #[tokio::test]
    async fn test_anonymize_reports_categories() {
        let gateway = gateway(Arc::new(EchoProvider::default()));
        let report = gateway
            .anonymize("a@b.com, c@d.com, 123-456-7890")
            .await
            .unwrap();
        assert_eq!(report.tokens, 3);
        assert_eq!(report.categories[&PiiCategory::Email], 2);
        assert_eq!(report.categories[&PiiCategory::Phone], 1);
        assert!(!report.text.contains("a@b.com"));
    }

    #[tokio::test]
    async fn test_document_unsupported_type() {
        let gateway = gateway(Arc::new(EchoProvider::default()));
        let err = gateway
            .anonymize_document(b"%PDF-1.7".to_vec(), "application/pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedContentType { .. }));
    }

    #[tokio::test]
    async fn test_document_size_limit() {
        let gateway = gateway(Arc::new(EchoProvider::default())).with_max_document_bytes(4);
        let err = gateway
            .anonymize_document(b"too long".to_vec(), "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[tokio::test]
    async fn test_document_blocks_redacted() {
        let gateway = gateway(Arc::new(EchoProvider::default()));
        let report = gateway
            .anonymize_document(
                b"Mail a@b.com\n\nMail a@b.com\n".to_vec(),
                "text/plain; charset=utf-8",
            )
            .await
            .unwrap();

        let text = String::from_utf8(report.content).unwrap();
        assert!(!text.contains("a@b.com"));
        assert_eq!(report.content_type, "text/plain");
        assert_eq!(report.blocks, 2);
        assert_eq!(report.detections, 2);
    }

    #[tokio::test]
    async fn test_audit_entries_hold_hashes_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit").join("trail.jsonl");
        let logger = Arc::new(AuditLogger::new(path.clone()).unwrap());
        let gateway = gateway(Arc::new(EchoProvider::default())).with_audit_logger(logger);

        gateway.chat("write to jan@example.com").await.unwrap();
        gateway.anonymize("and anna@example.com").await.unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(!contents.contains("jan@example.com"));
        assert!(!contents.contains("anna@example.com"));

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["flow"], "chat");
        assert_eq!(first["detections_count"], 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_audit_written_off_executor_for_concurrent_flows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trail.jsonl");
        let logger = Arc::new(AuditLogger::new(path.clone()).unwrap());
        let gateway = gateway(Arc::new(EchoProvider::default())).with_audit_logger(logger);

        let (a, b, c) = tokio::join!(
            gateway.anonymize("jan@example.com"),
            gateway.chat("anna@example.com"),
            gateway.anonymize_document(b"a@example.com\n\nb@example.com".to_vec(), "text/plain"),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let mut flows: Vec<String> = contents
            .lines()
            .map(|line| {
                let entry: serde_json::Value = serde_json::from_str(line).unwrap();
                entry["flow"].as_str().unwrap().to_string()
            })
            .collect();
        flows.sort();
        assert_eq!(flows, vec!["chat", "document", "redact"]);
    }

    #[tokio::test]
    async fn test_audit_write_failure_does_not_fail_flow() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened for appending
        let logger = Arc::new(AuditLogger::new(dir.path().to_path_buf()).unwrap());
        let gateway = gateway(Arc::new(EchoProvider::default())).with_audit_logger(logger);

        let report = gateway.anonymize("jan@example.com").await.unwrap();
        assert_eq!(report.tokens, 1);
    }

    #[test]
    fn test_from_config_defaults_to_echo() {
        let gateway = PiiGateway::from_config(&GatewayConfig::default()).unwrap();
        assert_eq!(gateway.provider_name(), "echo");
        assert_eq!(
            gateway.supported_content_types(),
            vec!["application/json", "text/csv", "text/plain"]
        );
    }
}
