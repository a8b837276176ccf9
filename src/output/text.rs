//! Text output formatter for human-readable display
//!
//! Normal runs print one message per update decision followed by a closing
//! line. Dry runs print each resulting file under a `==> path <==` header,
//! either in full or only the lines that changed.

use crate::domain::UpdateRecord;
use crate::orchestrator::{ManifestOutcome, OrchestratorResult};
use crate::output::{DryRunDisplay, OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Closing line of a normal run
pub const UP_TO_DATE: &str = "All requirements up-to-date.";

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Dry-run display mode
    dry_run: DryRunDisplay,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: DryRunDisplay) -> Self {
        Self::with_color(verbosity, dry_run, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: DryRunDisplay, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    fn format_record(&self, record: &UpdateRecord, writer: &mut dyn Write) -> std::io::Result<()> {
        if !self.color {
            return writeln!(writer, "{}", record.message);
        }
        if record.updated {
            writeln!(writer, "{}", record.message.green())
        } else {
            writeln!(writer, "{}", record.message.yellow())
        }
    }

    fn format_dry_run(
        &self,
        manifest: &ManifestOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let header = format!("==> {} <==", manifest.output.display());
        if self.color {
            writeln!(writer, "{}", header.bold())?;
        } else {
            writeln!(writer, "{}", header)?;
        }

        match self.dry_run {
            DryRunDisplay::ChangedOnly => {
                for line in &manifest.changed_lines {
                    writeln!(writer, "{}", line)?;
                }
            }
            _ => {
                write!(writer, "{}", manifest.content)?;
                if !manifest.content.is_empty() && !manifest.content.ends_with('\n') {
                    writeln!(writer)?;
                }
            }
        }
        writeln!(writer)
    }

    fn format_written(
        &self,
        manifest: &ManifestOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let line = if manifest.written {
            format!("Wrote {}", manifest.output.display())
        } else {
            format!("Left {} unchanged", manifest.path.display())
        };
        if self.color {
            writeln!(writer, "{}", line.dimmed())
        } else {
            writeln!(writer, "{}", line)
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.dry_run != DryRunDisplay::Off {
            for manifest in &result.manifests {
                self.format_dry_run(manifest, writer)?;
            }
            return Ok(());
        }

        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }

        for record in result.report.records() {
            self.format_record(record, writer)?;
        }

        if self.verbosity == Verbosity::Verbose {
            for manifest in &result.manifests {
                self.format_written(manifest, writer)?;
            }
        }

        writeln!(writer, "{}", UP_TO_DATE)
    }
}
