//! Anonymize command implementation
//!
//! Runs the redact-only flow and prints the substituted text. With
//! `--json` a category summary is printed alongside; original values never
//! appear in the output.

use super::{build_gateway, read_input, report_error, EXIT_SUCCESS};
use crate::config::GatewayConfig;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Text to anonymize (reads stdin when neither this nor --file is given)
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Print a JSON report with token and category counts
    #[arg(long)]
    pub json: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(&self, config: &GatewayConfig) -> anyhow::Result<i32> {
        let text = read_input(self.text.as_deref(), self.file.as_ref())?;

        let gateway = match build_gateway(config) {
            Ok(g) => g,
            Err(code) => return Ok(code),
        };

        let report = match gateway.anonymize(&text).await {
            Ok(r) => r,
            Err(e) => return Ok(report_error(&e)),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report.text);
        }

        Ok(EXIT_SUCCESS)
    }
}
