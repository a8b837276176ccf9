//! Candidate version selection

use super::filter::UpdatePolicy;
use crate::domain::Version;

/// Pick the highest candidate allowed by the package's policy.
///
/// With a `current` version, patch-limited packages keep its major (and minor,
/// when it has one) and minor-limited packages keep its major. Pre-releases are
/// dropped unless the package is in the pre list. Returns `None` when nothing
/// is left.
pub fn select_latest<'a>(
    package: &str,
    candidates: &'a [Version],
    current: Option<&Version>,
    policy: &UpdatePolicy,
) -> Option<&'a Version> {
    let allow_pre = policy.pre.contains(package);
    let patch_only = policy.patch.contains(package);
    let minor_only = !patch_only && policy.minor.contains(package);

    candidates
        .iter()
        .filter(|candidate| match current {
            Some(current) if patch_only => {
                candidate.major() == current.major()
                    && current
                        .minor()
                        .is_none_or(|minor| candidate.minor().unwrap_or(0) == minor)
            }
            Some(current) if minor_only => candidate.major() == current.major(),
            _ => true,
        })
        .filter(|candidate| allow_pre || !candidate.is_prerelease())
        .max()
}
