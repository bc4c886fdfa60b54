//! Chat command implementation
//!
//! Runs the round-trip flow: the prompt is anonymized, sent to the
//! configured generation service, and the reply is printed with the
//! original values restored.

use super::{build_gateway, read_input, report_error, EXIT_SUCCESS};
use crate::config::GatewayConfig;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the chat command
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Prompt text (reads stdin when neither this nor --file is given)
    #[arg(conflicts_with = "file")]
    pub prompt: Option<String>,

    /// Read the prompt from a file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl ChatArgs {
    /// Execute the chat command
    pub async fn execute(&self, config: &GatewayConfig) -> anyhow::Result<i32> {
        let prompt = read_input(self.prompt.as_deref(), self.file.as_ref())?;

        let gateway = match build_gateway(config) {
            Ok(g) => g,
            Err(code) => return Ok(code),
        };

        match gateway.chat(&prompt).await {
            Ok(reply) => {
                println!("{}", reply.text);
                tracing::debug!(
                    tokens = reply.tokens,
                    duration_ms = reply.duration.as_millis() as u64,
                    "Chat reply printed"
                );
                Ok(EXIT_SUCCESS)
            }
            Err(e) => Ok(report_error(&e)),
        }
    }
}
