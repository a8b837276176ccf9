//! Update judgment logic for requirements
//!
//! This module provides:
//! - Update policy configuration from CLI args
//! - Candidate selection under minor/patch/pre-release policy
//! - Interactive confirmation
//! - Update judgment engine that decides whether to update, skip or stop

mod filter;
mod prompt;
mod selector;

pub use filter::{PackageSet, UpdatePolicy, WILDCARD};
pub use prompt::{ask_to_update, Answer, Prompter, ScriptedPrompter, TerminalPrompter};
pub use selector::select_latest;

use crate::domain::{ConstraintSummary, CurrentVersion, Requirement, Version};
use std::io;

/// Verdict for one requirement line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Rewrite the line
    Update,
    /// Leave the line as it is
    Skip,
    /// Stop updating; every remaining line passes through unchanged
    Abort,
}

/// Update judgment engine that decides whether to update a requirement
pub struct UpdateJudge {
    policy: UpdatePolicy,
}

impl UpdateJudge {
    /// Create a new UpdateJudge with the given policy
    pub fn new(policy: UpdatePolicy) -> Self {
        Self { policy }
    }

    /// Whether the line should be considered at all
    pub fn should_check(&self, requirement: &Requirement, summary: &ConstraintSummary) -> bool {
        self.policy.should_check(requirement, summary)
    }

    /// Whether the index needs to be asked about this line.
    ///
    /// Unconstrained lines only matter when forcing, and direct references
    /// never do.
    pub fn needs_candidates(&self, requirement: &Requirement, summary: &ConstraintSummary) -> bool {
        !requirement.direct_reference && (summary.has_constraint() || self.policy.force)
    }

    /// Choose the best candidate for this line
    pub fn select<'a>(
        &self,
        requirement: &Requirement,
        summary: &ConstraintSummary,
        candidates: &'a [Version],
    ) -> Option<&'a Version> {
        select_latest(&requirement.name, candidates, summary.current(), &self.policy)
    }

    /// Whether the constraints allow moving to `latest`, without asking anyone
    pub fn allows_update(
        &self,
        requirement: &Requirement,
        summary: &ConstraintSummary,
        latest: Option<&Version>,
    ) -> bool {
        let Some(latest) = latest else {
            return false;
        };

        if !summary.has_constraint() {
            // `~=` and `===` lines have specifiers we cannot summarize; pinning
            // them would produce a conflicting requirement
            return self.policy.force
                && !requirement.direct_reference
                && requirement.specifiers.is_empty();
        }

        summary.permits(latest)
    }

    /// Full decision for one line, asking the user when interactive
    pub fn decide(
        &self,
        requirement: &Requirement,
        summary: &ConstraintSummary,
        latest: Option<&Version>,
        prompter: &mut dyn Prompter,
    ) -> io::Result<Decision> {
        let Some(latest) = latest.filter(|l| self.allows_update(requirement, summary, Some(*l)))
        else {
            return Ok(Decision::Skip);
        };

        if !self.policy.interactive {
            return Ok(Decision::Update);
        }

        let current = CurrentVersion::from(summary.old_version());
        let answer = ask_to_update(
            prompter,
            &requirement.name,
            &current.to_string(),
            latest.as_str(),
        )?;
        Ok(match answer {
            Answer::Yes => Decision::Update,
            Answer::No => Decision::Skip,
            Answer::Quit => Decision::Abort,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Operator;

    fn make_requirement(name: &str, specs: &[(Operator, &str)]) -> Requirement {
        let mut req = Requirement::new(name);
        for (op, ver) in specs {
            req = req.with_specifier(*op, *ver);
        }
        req
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn allows(policy: UpdatePolicy, req: &Requirement, latest: &str) -> bool {
        let summary = ConstraintSummary::from_specifiers(&req.specifiers);
        UpdateJudge::new(policy).allows_update(req, &summary, Some(&v(latest)))
    }

    #[test]
    fn test_no_candidate() {
        let req = make_requirement("flask", &[(Operator::Equal, "0.9")]);
        let summary = ConstraintSummary::from_specifiers(&req.specifiers);
        let judge = UpdateJudge::new(UpdatePolicy::new());
        assert!(!judge.allows_update(&req, &summary, None));
    }

    #[test]
    fn test_pinned_newer_candidate() {
        let req = make_requirement("flask", &[(Operator::Equal, "0.9")]);
        assert!(allows(UpdatePolicy::new(), &req, "0.10.1"));
        assert!(!allows(UpdatePolicy::new(), &req, "0.9"));
    }

    #[test]
    fn test_unpinned_requires_force() {
        let req = make_requirement("flask", &[]);
        assert!(!allows(UpdatePolicy::new(), &req, "0.10.1"));
        assert!(allows(UpdatePolicy::new().with_force(true), &req, "0.10.1"));
    }

    #[test]
    fn test_force_never_pins_direct_reference() {
        let req = make_requirement("pip", &[]).as_direct_reference();
        assert!(!allows(UpdatePolicy::new().with_force(true), &req, "24.0"));
    }

    #[test]
    fn test_force_never_pins_compatible_release() {
        let req = make_requirement("flask", &[(Operator::Compatible, "0.9")]);
        assert!(!allows(UpdatePolicy::new().with_force(true), &req, "1.0"));
    }

    #[test]
    fn test_upper_bound_blocks() {
        let req = make_requirement("flask", &[(Operator::Greater, "1.8.6"), (Operator::Less, "1.9")]);
        assert!(allows(UpdatePolicy::new(), &req, "1.8.13"));
        assert!(!allows(UpdatePolicy::new(), &req, "1.9"));
    }

    #[test]
    fn test_not_equal_blocks_exact_candidate() {
        let req = make_requirement("flask", &[(Operator::NotEqual, "2.0")]);
        assert!(!allows(UpdatePolicy::new(), &req, "2.0"));
        assert!(allows(UpdatePolicy::new(), &req, "2.1"));
    }

    #[test]
    fn test_needs_candidates() {
        let judge = UpdateJudge::new(UpdatePolicy::new());
        let req = make_requirement("flask", &[]);
        let summary = ConstraintSummary::default();
        assert!(!judge.needs_candidates(&req, &summary));

        let judge = UpdateJudge::new(UpdatePolicy::new().with_force(true));
        assert!(judge.needs_candidates(&req, &summary));

        let req = make_requirement("pip", &[]).as_direct_reference();
        assert!(!judge.needs_candidates(&req, &summary));
    }

    #[test]
    fn test_select_uses_current_version() {
        let judge = UpdateJudge::new(
            UpdatePolicy::new().with_minor(["flask"].into_iter().collect()),
        );
        let req = make_requirement("flask", &[(Operator::Equal, "0.9")]);
        let summary = ConstraintSummary::from_specifiers(&req.specifiers);
        let candidates = vec![v("0.9"), v("0.10.1"), v("1.0")];
        assert_eq!(
            judge.select(&req, &summary, &candidates).map(|v| v.as_str()),
            Some("0.10.1")
        );
    }

    #[test]
    fn test_decide_non_interactive() {
        let judge = UpdateJudge::new(UpdatePolicy::new());
        let req = make_requirement("flask", &[(Operator::Equal, "0.9")]);
        let summary = ConstraintSummary::from_specifiers(&req.specifiers);
        let mut prompter = ScriptedPrompter::default();

        let latest = v("0.10.1");
        let decision = judge
            .decide(&req, &summary, Some(&latest), &mut prompter)
            .unwrap();
        assert_eq!(decision, Decision::Update);
        assert!(prompter.questions.is_empty());

        let old = v("0.9");
        let decision = judge.decide(&req, &summary, Some(&old), &mut prompter).unwrap();
        assert_eq!(decision, Decision::Skip);
    }

    #[test]
    fn test_decide_interactive_answers() {
        let judge = UpdateJudge::new(UpdatePolicy::new().with_interactive(true));
        let req = make_requirement("flask", &[(Operator::Equal, "0.9")]);
        let summary = ConstraintSummary::from_specifiers(&req.specifiers);
        let latest = v("0.10.1");

        let mut prompter = ScriptedPrompter::new(["y", "n", "q"]);
        let mut decide = || judge.decide(&req, &summary, Some(&latest), &mut prompter).unwrap();
        assert_eq!(decide(), Decision::Update);
        assert_eq!(decide(), Decision::Skip);
        assert_eq!(decide(), Decision::Abort);
    }

    #[test]
    fn test_decide_interactive_not_asked_when_blocked() {
        let judge = UpdateJudge::new(UpdatePolicy::new().with_interactive(true));
        let req = make_requirement("flask", &[(Operator::Equal, "0.10.1")]);
        let summary = ConstraintSummary::from_specifiers(&req.specifiers);
        let latest = v("0.10.1");
        let mut prompter = ScriptedPrompter::default();

        let decision = judge
            .decide(&req, &summary, Some(&latest), &mut prompter)
            .unwrap();
        assert_eq!(decision, Decision::Skip);
        assert!(prompter.questions.is_empty());
    }

    #[test]
    fn test_interactive_question_shows_unknown() {
        let judge = UpdateJudge::new(
            UpdatePolicy::new().with_interactive(true).with_force(true),
        );
        let req = make_requirement("flask", &[]);
        let summary = ConstraintSummary::default();
        let latest = v("1.0");
        let mut prompter = ScriptedPrompter::new(["y"]);

        judge
            .decide(&req, &summary, Some(&latest), &mut prompter)
            .unwrap();
        assert_eq!(prompter.questions, vec!["Update flask from Unknown to 1.0? (y, n, q)"]);
    }

    /// Outcome of one line under `policy`, the way the orchestrator asks
    fn verdict(policy: &UpdatePolicy, req: &Requirement, prompter: &mut ScriptedPrompter) -> Decision {
        let judge = UpdateJudge::new(policy.clone());
        let summary = ConstraintSummary::from_specifiers(&req.specifiers);
        if !judge.should_check(req, &summary) || !judge.needs_candidates(req, &summary) {
            return Decision::Skip;
        }
        let latest = v("2.0");
        judge
            .decide(req, &summary, Some(&latest), prompter)
            .unwrap()
    }

    #[test]
    fn test_policy_combinations() {
        let flask = || ["flask"].into_iter().collect::<PackageSet>();
        let force = UpdatePolicy::new().with_force(true);
        let interactive = UpdatePolicy::new().with_interactive(true);
        let cases: Vec<(&str, UpdatePolicy, Requirement, Vec<&str>, Decision, usize)> = vec![
            (
                "force with skip",
                force.clone().with_skip(flask()),
                make_requirement("flask", &[]),
                vec![],
                Decision::Skip,
                0,
            ),
            (
                "force with skip, other package",
                force.clone().with_skip(flask()),
                make_requirement("django", &[]),
                vec![],
                Decision::Update,
                0,
            ),
            (
                "force with only",
                force.clone().with_only(flask()),
                make_requirement("django", &[]),
                vec![],
                Decision::Skip,
                0,
            ),
            (
                "force with only, listed package",
                force.clone().with_only(flask()),
                make_requirement("flask", &[]),
                vec![],
                Decision::Update,
                0,
            ),
            (
                "force with skip-gt, lower bound",
                force.clone().with_skip_gt(true),
                make_requirement("flask", &[(Operator::GreaterEqual, "1.0")]),
                vec![],
                Decision::Skip,
                0,
            ),
            (
                "force with skip-gt, unconstrained",
                force.clone().with_skip_gt(true),
                make_requirement("flask", &[]),
                vec![],
                Decision::Update,
                0,
            ),
            (
                "force with interactive, accepted",
                force.clone().with_interactive(true),
                make_requirement("flask", &[]),
                vec!["y"],
                Decision::Update,
                1,
            ),
            (
                "force with interactive, quit",
                force.clone().with_interactive(true),
                make_requirement("flask", &[]),
                vec!["q"],
                Decision::Abort,
                1,
            ),
            (
                "interactive with skip",
                interactive.clone().with_skip(flask()),
                make_requirement("flask", &[(Operator::Equal, "1.0")]),
                vec![],
                Decision::Skip,
                0,
            ),
            (
                "interactive with skip, other package",
                interactive.clone().with_skip(flask()),
                make_requirement("django", &[(Operator::Equal, "1.0")]),
                vec!["y"],
                Decision::Update,
                1,
            ),
            (
                "interactive with only",
                interactive.clone().with_only(flask()),
                make_requirement("django", &[(Operator::Equal, "1.0")]),
                vec![],
                Decision::Skip,
                0,
            ),
            (
                "interactive with only, declined",
                interactive.clone().with_only(flask()),
                make_requirement("flask", &[(Operator::Equal, "1.0")]),
                vec!["n"],
                Decision::Skip,
                1,
            ),
            (
                "interactive with skip-gt",
                interactive.clone().with_skip_gt(true),
                make_requirement("flask", &[(Operator::Greater, "1.0")]),
                vec![],
                Decision::Skip,
                0,
            ),
        ];

        for (name, policy, req, answers, expected, asked) in cases {
            let mut prompter = ScriptedPrompter::new(answers);
            assert_eq!(verdict(&policy, &req, &mut prompter), expected, "{name}");
            assert_eq!(prompter.questions.len(), asked, "{name}");
        }
    }

    #[test]
    fn test_decision_is_monotonic_below_upper_bound() {
        let versions: Vec<Version> = [
            "0.9", "1.0a1", "1.0", "1.0.1", "1.1", "1.5", "1.9.9", "2.0rc1", "2.0", "2.0.1",
            "3.0",
        ]
        .iter()
        .map(|s| v(s))
        .collect();
        let shapes: Vec<Vec<(Operator, &str)>> = vec![
            vec![(Operator::Equal, "1.0")],
            vec![(Operator::GreaterEqual, "1.0")],
            vec![(Operator::Greater, "1.0"), (Operator::Less, "2.0")],
            vec![(Operator::GreaterEqual, "1.0"), (Operator::LessEqual, "2.0")],
            vec![(Operator::Equal, "1.0"), (Operator::NotEqual, "1.5")],
            vec![(Operator::GreaterEqual, "0.9"), (Operator::Less, "1.9.9")],
        ];

        for specs in shapes {
            let req = make_requirement("flask", &specs);
            let passes_upper = |candidate: &Version| {
                req.specifiers.iter().all(|spec| {
                    let bound = v(&spec.version);
                    match spec.operator {
                        Operator::Less => candidate < &bound,
                        Operator::LessEqual => candidate <= &bound,
                        Operator::NotEqual => candidate != &bound,
                        _ => true,
                    }
                })
            };

            for (i, lower) in versions.iter().enumerate() {
                if !allows(UpdatePolicy::new(), &req, lower.as_str()) {
                    continue;
                }
                for higher in versions[i + 1..].iter().filter(|c| passes_upper(*c)) {
                    assert!(
                        allows(UpdatePolicy::new(), &req, higher.as_str()),
                        "{:?}: {} allowed but {} is not",
                        specs,
                        lower,
                        higher
                    );
                }
            }
        }
    }
}
