//! Output formatting for update results
//!
//! This module provides:
//! - Text output: update messages, or the resulting files in dry-run mode
//! - JSON output for machine processing

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::orchestrator::{OrchestratorResult, Warning};
use colored::Colorize;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output with additional information
    Verbose,
}

/// What a dry run prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DryRunDisplay {
    /// Not a dry run
    #[default]
    Off,
    /// Every resulting file in full
    Full,
    /// Only the lines that changed
    ChangedOnly,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Dry-run display mode
    pub dry_run: DryRunDisplay,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            dry_run: DryRunDisplay::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create a new output configuration
    pub fn new(format: OutputFormat, verbosity: Verbosity, dry_run: DryRunDisplay) -> Self {
        Self {
            format,
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Create configuration from CLI arguments
    pub fn from_cli(
        json: bool,
        verbose: bool,
        quiet: bool,
        dry_run: bool,
        dry_run_changed: bool,
    ) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        let dry_run = if dry_run_changed {
            DryRunDisplay::ChangedOnly
        } else if dry_run {
            DryRunDisplay::Full
        } else {
            DryRunDisplay::Off
        };

        Self {
            format,
            verbosity,
            dry_run,
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the orchestrator result
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Format and write the warnings of a run, normally to stderr
    fn format_warnings(
        &self,
        warnings: &[Warning],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        for warning in warnings {
            writeln!(writer, "{} {}", "warning:".yellow().bold(), warning)?;
        }
        Ok(())
    }
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(
            config.verbosity,
            config.dry_run,
            config.color,
        )),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_config_default() {
        let config = OutputConfig::default();
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert_eq!(config.dry_run, DryRunDisplay::Off);
        assert!(config.color);
    }

    #[test]
    fn test_output_config_from_cli_json() {
        let config = OutputConfig::from_cli(true, false, false, false, false);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.verbosity, Verbosity::Normal);
    }

    #[test]
    fn test_output_config_from_cli_verbosity() {
        let config = OutputConfig::from_cli(false, true, false, false, false);
        assert_eq!(config.verbosity, Verbosity::Verbose);

        let config = OutputConfig::from_cli(false, false, true, false, false);
        assert_eq!(config.verbosity, Verbosity::Quiet);
    }

    #[test]
    fn test_output_config_from_cli_dry_run() {
        let config = OutputConfig::from_cli(false, false, false, true, false);
        assert_eq!(config.dry_run, DryRunDisplay::Full);

        let config = OutputConfig::from_cli(false, false, false, true, true);
        assert_eq!(config.dry_run, DryRunDisplay::ChangedOnly);
    }

    #[test]
    fn test_default_warning_format() {
        colored::control::set_override(false);
        let formatter = create_formatter(OutputConfig::default().with_color(false));
        let warnings = vec![Warning {
            package: "missing".to_string(),
            path: "requirements.txt".into(),
            line_number: 2,
            message: "package 'missing' not found in package index".to_string(),
        }];

        let mut out = Vec::new();
        formatter.format_warnings(&warnings, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("warning: Skipping missing (requirements.txt line 2)"));
    }
}
