//! Manifest file reading and writing
//!
//! This module provides:
//! - read_manifest, which distinguishes a missing file from other read failures
//! - ManifestWriter, which writes each finished file once and never in dry-run mode

use crate::error::ManifestError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writer for finished manifest content
#[derive(Debug, Clone, Copy)]
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

/// Result of writing one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Where the content was (or would have been) written
    pub path: PathBuf,
    /// Whether the file was actually written
    pub written: bool,
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write `content` to `output`.
    ///
    /// Writing in place is skipped when the content did not change.
    pub fn write(
        &self,
        source: &Path,
        output: &Path,
        original: &str,
        content: &str,
    ) -> Result<WriteResult, ManifestError> {
        let mut result = WriteResult {
            path: output.to_path_buf(),
            written: false,
        };

        if self.dry_run {
            return Ok(result);
        }
        if source == output && original == content {
            debug!("{} unchanged, not writing", output.display());
            return Ok(result);
        }

        write_manifest(output, content)?;
        result.written = true;
        Ok(result)
    }
}

/// Read a manifest file
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ManifestError::not_found(path),
        _ => ManifestError::read_error(path, e),
    })
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}
