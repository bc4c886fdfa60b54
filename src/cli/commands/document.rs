//! Document command implementation
//!
//! Redacts every block of a document and writes the result to `--output`
//! or stdout. The content type is inferred from the file extension unless
//! given explicitly.

use super::{build_gateway, report_error, EXIT_CALLER, EXIT_SUCCESS};
use crate::adapters::documents::content_type_for_path;
use crate::config::GatewayConfig;
use anyhow::Context;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

/// Arguments for the document command
#[derive(Args, Debug)]
pub struct DocumentArgs {
    /// Document to redact
    pub path: PathBuf,

    /// MIME type (inferred from the extension when omitted)
    #[arg(long, value_name = "MIME")]
    pub content_type: Option<String>,

    /// Write the redacted document here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl DocumentArgs {
    /// Execute the document command
    pub async fn execute(&self, config: &GatewayConfig) -> anyhow::Result<i32> {
        let content_type = match self
            .content_type
            .as_deref()
            .or_else(|| content_type_for_path(&self.path))
        {
            Some(ct) => ct.to_string(),
            None => {
                eprintln!(
                    "Cannot infer content type of {}; pass --content-type",
                    self.path.display()
                );
                return Ok(EXIT_CALLER);
            }
        };

        let content = std::fs::read(&self.path)
            .with_context(|| format!("Failed to read document: {}", self.path.display()))?;

        let gateway = match build_gateway(config) {
            Ok(g) => g,
            Err(code) => return Ok(code),
        };

        let report = match gateway.anonymize_document(content, &content_type).await {
            Ok(r) => r,
            Err(e) => return Ok(report_error(&e)),
        };

        match self.output {
            Some(ref path) => {
                std::fs::write(path, &report.content)
                    .with_context(|| format!("Failed to write output: {}", path.display()))?;
                report.log_summary();
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&report.content)?;
                stdout.flush()?;
            }
        }

        Ok(EXIT_SUCCESS)
    }
}
