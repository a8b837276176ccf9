//! Update policy configuration
//!
//! This module provides the UpdatePolicy struct that encapsulates all
//! per-package policy options for update judgment. Package lists match
//! canonical names, case-insensitively, and `*` matches every package.

use crate::domain::{canonicalize_name, ConstraintSummary, Requirement};
use std::collections::HashSet;

/// Wildcard entry matching every package
pub const WILDCARD: &str = "*";

/// A set of package names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSet {
    names: HashSet<String>,
    wildcard: bool,
}

impl PackageSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set matching every package
    pub fn all() -> Self {
        Self {
            names: HashSet::new(),
            wildcard: true,
        }
    }

    /// True if `name` is in the set
    pub fn contains(&self, name: &str) -> bool {
        self.wildcard || self.names.contains(&canonicalize_name(name))
    }

    pub fn is_empty(&self) -> bool {
        !self.wildcard && self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for PackageSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = PackageSet::new();
        for name in iter {
            let name = name.as_ref().trim();
            if name == WILDCARD {
                set.wildcard = true;
            } else if !name.is_empty() {
                set.names.insert(canonicalize_name(name));
            }
        }
        set
    }
}

/// Policy configuration for update judgment
#[derive(Debug, Clone, Default)]
pub struct UpdatePolicy {
    /// Packages never touched
    pub skip: PackageSet,
    /// If non-empty, only these packages are touched
    pub only: PackageSet,
    /// Packages limited to the current major version
    pub minor: PackageSet,
    /// Packages limited to the current major.minor version
    pub patch: PackageSet,
    /// Packages allowed to move to pre-releases
    pub pre: PackageSet,
    /// Skip lines with a `>` or `>=` bound
    pub skip_gt: bool,
    /// Pin unconstrained requirements to the latest version
    pub force: bool,
    /// Ask before each update
    pub interactive: bool,
}

impl UpdatePolicy {
    /// Create a new UpdatePolicy with default settings (update everything)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip(mut self, skip: PackageSet) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_only(mut self, only: PackageSet) -> Self {
        self.only = only;
        self
    }

    pub fn with_minor(mut self, minor: PackageSet) -> Self {
        self.minor = minor;
        self
    }

    pub fn with_patch(mut self, patch: PackageSet) -> Self {
        self.patch = patch;
        self
    }

    pub fn with_pre(mut self, pre: PackageSet) -> Self {
        self.pre = pre;
        self
    }

    pub fn with_skip_gt(mut self, skip_gt: bool) -> Self {
        self.skip_gt = skip_gt;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Not in the skip list
    pub fn passes_skip(&self, name: &str) -> bool {
        !self.skip.contains(name)
    }

    /// In the only list, or no only list given
    pub fn passes_only(&self, name: &str) -> bool {
        self.only.is_empty() || self.only.contains(name)
    }

    /// No lower bound, or skip-gt is off
    pub fn passes_skip_gt(&self, summary: &ConstraintSummary) -> bool {
        !(self.skip_gt && summary.has_lower_bound())
    }

    /// Whether a requirement line should be considered at all.
    ///
    /// The skip, only and skip-gt predicates are independent and all must hold.
    pub fn should_check(&self, requirement: &Requirement, summary: &ConstraintSummary) -> bool {
        self.passes_skip(&requirement.name)
            && self.passes_only(&requirement.name)
            && self.passes_skip_gt(summary)
    }
}
