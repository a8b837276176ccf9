//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the update report
//! - Per-file outcomes, with the resulting content for dry runs
//! - Warnings inline, so stderr stays free for logs

use crate::domain::UpdateReport;
use crate::orchestrator::{ManifestOutcome, OrchestratorResult, Warning};
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    dry_run: bool,
    aborted: bool,
    /// Number of lines rewritten
    updated: usize,
    /// Update records keyed by package
    packages: &'a UpdateReport,
    files: Vec<JsonManifest<'a>>,
    warnings: &'a [Warning],
}

#[derive(Serialize)]
struct JsonManifest<'a> {
    #[serde(flatten)]
    outcome: &'a ManifestOutcome,
    /// Resulting content, for dry runs and in verbose mode
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let with_content = result.dry_run || self.verbosity == Verbosity::Verbose;
        let output = JsonOutput {
            dry_run: result.dry_run,
            aborted: result.aborted,
            updated: result.report.updated_count(),
            packages: &result.report,
            files: result
                .manifests
                .iter()
                .map(|outcome| JsonManifest {
                    outcome,
                    content: with_content.then_some(outcome.content.as_str()),
                })
                .collect(),
            warnings: &result.warnings,
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }

    /// Warnings are part of the JSON document
    fn format_warnings(
        &self,
        _warnings: &[Warning],
        _writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        Ok(())
    }
}
