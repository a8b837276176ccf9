//! Per-package update records collected during a run

use super::version::Version;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// The version a line was at before the update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentVersion {
    Known(Version),
    /// The line had no `==` or `>=` bound to report
    Unknown,
}

impl From<Option<&Version>> for CurrentVersion {
    fn from(version: Option<&Version>) -> Self {
        match version {
            Some(v) => CurrentVersion::Known(v.clone()),
            None => CurrentVersion::Unknown,
        }
    }
}

impl fmt::Display for CurrentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrentVersion::Known(v) => write!(f, "{}", v),
            CurrentVersion::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Serialize for CurrentVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One accepted update decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRecord {
    pub package: String,
    pub current: CurrentVersion,
    pub latest: Version,
    /// True only if the line text actually changed
    pub updated: bool,
    pub message: String,
}

impl UpdateRecord {
    /// Record for a line that was rewritten
    pub fn updated(package: impl Into<String>, current: CurrentVersion, latest: Version) -> Self {
        let package = package.into();
        let message = format!("Updated {}: {} -> {}", package, current, latest);
        Self {
            package,
            current,
            latest,
            updated: true,
            message,
        }
    }

    /// Record for a line whose constraints left no token to rewrite
    pub fn prohibited(
        package: impl Into<String>,
        current: CurrentVersion,
        latest: Version,
        line: &str,
    ) -> Self {
        let package = package.into();
        let message = format!(
            "New version for {} found ({}), but current spec prohibits updating: {}",
            package,
            latest,
            line.trim()
        );
        Self {
            package,
            current,
            latest,
            updated: false,
            message,
        }
    }
}

/// Records grouped by package, in the order packages were first seen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UpdateReport {
    packages: IndexMap<String, Vec<UpdateRecord>>,
}

impl UpdateReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: UpdateRecord) {
        self.packages
            .entry(record.package.clone())
            .or_default()
            .push(record);
    }

    /// Records for a package, by name as written
    pub fn get(&self, package: &str) -> Option<&[UpdateRecord]> {
        self.packages.get(package).map(Vec::as_slice)
    }

    /// All records in encounter order
    pub fn records(&self) -> impl Iterator<Item = &UpdateRecord> {
        self.packages.values().flatten()
    }

    /// True if any line was rewritten
    pub fn has_updates(&self) -> bool {
        self.records().any(|r| r.updated)
    }

    pub fn updated_count(&self) -> usize {
        self.records().filter(|r| r.updated).count()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }
}
