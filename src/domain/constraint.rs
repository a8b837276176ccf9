//! Folding a requirement's specifiers into a single constraint summary

use super::requirement::{Operator, Specifier};
use super::version::Version;
use tracing::debug;

/// The tightest bounds expressed by a requirement's specifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSummary {
    pub equals: Option<Version>,
    pub greater: Option<Version>,
    pub greater_equal: Option<Version>,
    pub less: Option<Version>,
    pub less_equal: Option<Version>,
    pub not_equal: Option<Version>,
}

impl ConstraintSummary {
    /// Fold specifiers into a summary.
    ///
    /// `==` and `!=` keep the last value seen, lower bounds keep the maximum
    /// and upper bounds keep the minimum. Clauses whose version does not parse
    /// are skipped, as are `~=` and `===`.
    pub fn from_specifiers(specifiers: &[Specifier]) -> Self {
        let mut summary = Self::default();

        for spec in specifiers {
            let version = match Version::parse(&spec.version) {
                Ok(version) => version,
                Err(e) => {
                    debug!("ignoring specifier {}: {}", spec, e);
                    continue;
                }
            };

            match spec.operator {
                Operator::Equal => summary.equals = Some(version),
                Operator::NotEqual => summary.not_equal = Some(version),
                Operator::Greater => fold_max(&mut summary.greater, version),
                Operator::GreaterEqual => fold_max(&mut summary.greater_equal, version),
                Operator::Less => fold_min(&mut summary.less, version),
                Operator::LessEqual => fold_min(&mut summary.less_equal, version),
                Operator::Compatible | Operator::Arbitrary => {}
            }
        }

        summary
    }

    /// True if any bound is present
    pub fn has_constraint(&self) -> bool {
        self.equals.is_some()
            || self.greater.is_some()
            || self.greater_equal.is_some()
            || self.less.is_some()
            || self.less_equal.is_some()
            || self.not_equal.is_some()
    }

    /// True if the line has a `>` or `>=` bound
    pub fn has_lower_bound(&self) -> bool {
        self.greater.is_some() || self.greater_equal.is_some()
    }

    /// The version treated as "current" when applying minor/patch ceilings
    pub fn current(&self) -> Option<&Version> {
        self.equals
            .as_ref()
            .or(self.greater.as_ref())
            .or(self.greater_equal.as_ref())
            .or(self.less.as_ref())
            .or(self.less_equal.as_ref())
            .or(self.not_equal.as_ref())
    }

    /// The version token the line patcher rewrites
    pub fn old_version(&self) -> Option<&Version> {
        self.equals.as_ref().or(self.greater_equal.as_ref())
    }

    /// Whether `candidate` satisfies every bound.
    ///
    /// Lower bounds are treated strictly: a candidate equal to an existing
    /// `>=` bound is not an update.
    pub fn permits(&self, candidate: &Version) -> bool {
        if self.equals.as_ref().is_some_and(|eq| candidate <= eq) {
            return false;
        }
        if self.not_equal.as_ref().is_some_and(|ne| candidate == ne) {
            return false;
        }
        if self.less.as_ref().is_some_and(|lt| candidate >= lt) {
            return false;
        }
        if self.less_equal.as_ref().is_some_and(|lte| candidate > lte) {
            return false;
        }
        if self.greater.as_ref().is_some_and(|gt| candidate <= gt) {
            return false;
        }
        if self
            .greater_equal
            .as_ref()
            .is_some_and(|gte| candidate <= gte)
        {
            return false;
        }
        true
    }
}

fn fold_max(slot: &mut Option<Version>, version: Version) {
    match slot {
        Some(existing) if *existing >= version => {}
        _ => *slot = Some(version),
    }
}

fn fold_min(slot: &mut Option<Version>, version: Version) {
    match slot {
        Some(existing) if *existing <= version => {}
        _ => *slot = Some(version),
    }
}
