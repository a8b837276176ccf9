//! Core domain models for requp
//!
//! This module contains the fundamental types used throughout the application:
//! - PEP 440 versions
//! - Requirements, specifiers and line classification
//! - Constraint summaries folded from specifiers
//! - Update records and the per-run report

mod constraint;
mod report;
mod requirement;
mod version;

pub use constraint::ConstraintSummary;
pub use report::{CurrentVersion, UpdateRecord, UpdateReport};
pub use requirement::{
    canonicalize_name, IncludeKind, Operator, ParsedLine, Requirement, Specifier,
};
pub use version::{PreRelease, Version, VersionError};
