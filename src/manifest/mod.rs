//! Requirements manifest handling
//!
//! This module provides functionality to:
//! - Reconstruct logical lines from a requirements file
//! - Rewrite version tokens inside a single line
//! - Read and write manifest files

mod joiner;
mod patcher;
mod writer;

pub use joiner::{logical_lines, LogicalLine, LogicalLines};
pub use patcher::{pin_requirement_line, update_requirement_line};
pub use writer::{read_manifest, write_manifest, ManifestWriter, WriteResult};

/// True if an include target points at a remote location
pub fn is_remote_target(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    ["http://", "https://", "ftp://", "file://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}
