//! Named requirement grammar
//!
//! Handles:
//! - `name`, `name[extra1,extra2]`
//! - specifier lists: `==1.0`, `>=1.0,<2.0`, `(>=1.0)`
//! - environment markers: `name>=1.0; python_version < "3.8"`
//! - per-requirement options: `name==1.0 --hash=sha256:...`
//! - direct references: `name @ https://...`, `https://...#egg=name`

use crate::domain::{Operator, Requirement, Specifier};
use regex::Regex;
use std::sync::LazyLock;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[(?P<extras>[^\]]*)\])?\s*(?P<rest>.*)$",
    )
    .unwrap()
});
static CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<op>===|~=|==|!=|<=|>=|<|>)\s*(?P<version>[^\s,;]+)$").unwrap()
});
static PER_REQ_OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+--?[A-Za-z]").unwrap());
static EGG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#egg=(?P<name>[A-Za-z0-9][A-Za-z0-9._-]*)").unwrap());

/// Parse a requirement with comments already removed.
///
/// Returns `None` when the text is not a valid named requirement.
pub fn parse_requirement(text: &str) -> Option<Requirement> {
    let text = match PER_REQ_OPTION_RE.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
    .trim();

    if text.is_empty() {
        return None;
    }

    if let Some(caps) = NAME_RE.captures(text) {
        let rest = caps["rest"].trim();
        let extras = caps
            .name("extras")
            .map(|m| parse_extras(m.as_str()))
            .unwrap_or_default();
        let requirement = Requirement::new(&caps["name"]).with_extras(extras);

        if let Some(url) = rest.strip_prefix('@') {
            return parse_direct_reference(requirement, url);
        }

        if rest.is_empty() || rest.starts_with(['<', '>', '=', '!', '~', '(', ';']) {
            return parse_versioned(requirement, rest);
        }
    }

    parse_unnamed_url(text)
}

fn parse_extras(extras: &str) -> Vec<String> {
    extras
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_versioned(mut requirement: Requirement, rest: &str) -> Option<Requirement> {
    let (spec_text, marker) = match rest.split_once(';') {
        Some((specs, marker)) => (specs.trim(), Some(marker.trim())),
        None => (rest, None),
    };

    requirement.specifiers = parse_specifiers(spec_text)?;
    if let Some(marker) = marker.filter(|m| !m.is_empty()) {
        requirement = requirement.with_marker(marker);
    }
    Some(requirement)
}

/// Parse a comma separated specifier list, optionally wrapped in parentheses
pub fn parse_specifiers(text: &str) -> Option<Vec<Specifier>> {
    let mut text = text.trim();
    if let Some(inner) = text.strip_prefix('(') {
        text = inner.strip_suffix(')')?.trim();
    }
    if text.is_empty() {
        return Some(Vec::new());
    }

    text.split(',')
        .map(|clause| {
            let caps = CLAUSE_RE.captures(clause.trim())?;
            let operator = Operator::from_token(&caps["op"])?;
            Some(Specifier::new(operator, &caps["version"]))
        })
        .collect()
}

fn parse_direct_reference(requirement: Requirement, url: &str) -> Option<Requirement> {
    // Markers after a URL must be separated by whitespace
    let (url, marker) = match url.find(" ;") {
        Some(idx) => (url[..idx].trim(), Some(url[idx + 2..].trim())),
        None => (url.trim(), None),
    };
    if url.is_empty() {
        return None;
    }

    let mut requirement = requirement.as_direct_reference();
    if let Some(marker) = marker.filter(|m| !m.is_empty()) {
        requirement = requirement.with_marker(marker);
    }
    Some(requirement)
}

fn parse_unnamed_url(text: &str) -> Option<Requirement> {
    let looks_like_location = text.contains("://")
        || text.starts_with(['.', '/', '~'])
        || text.contains('\\');
    if !looks_like_location {
        return None;
    }
    let caps = EGG_RE.captures(text)?;
    Some(Requirement::new(&caps["name"]).as_direct_reference())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(req: &Requirement) -> Vec<String> {
        req.specifiers.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bare_name() {
        let req = parse_requirement("flask").unwrap();
        assert_eq!(req.name, "flask");
        assert!(req.specifiers.is_empty());
        assert!(req.extras.is_empty());
        assert!(!req.direct_reference);
    }

    #[test]
    fn test_pinned() {
        let req = parse_requirement("Flask==0.9").unwrap();
        assert_eq!(req.name, "Flask");
        assert_eq!(specs(&req), vec!["==0.9"]);
    }

    #[test]
    fn test_whitespace_around_operator() {
        let req = parse_requirement("flask == 0.9").unwrap();
        assert_eq!(specs(&req), vec!["==0.9"]);
    }

    #[test]
    fn test_multiple_specifiers() {
        let req = parse_requirement("flask>1.8.6,<1.9").unwrap();
        assert_eq!(specs(&req), vec![">1.8.6", "<1.9"]);

        let req = parse_requirement("django >= 1.4, != 1.5 , <2").unwrap();
        assert_eq!(specs(&req), vec![">=1.4", "!=1.5", "<2"]);
    }

    #[test]
    fn test_parenthesized_specifiers() {
        let req = parse_requirement("flask (>=0.9)").unwrap();
        assert_eq!(specs(&req), vec![">=0.9"]);
    }

    #[test]
    fn test_extras() {
        let req = parse_requirement("requests[security, socks]==2.0").unwrap();
        assert_eq!(req.name, "requests");
        assert_eq!(req.extras, vec!["security", "socks"]);
        assert_eq!(specs(&req), vec!["==2.0"]);
    }

    #[test]
    fn test_marker() {
        let req = parse_requirement("flask==0.9; python_version < '3.8'").unwrap();
        assert_eq!(specs(&req), vec!["==0.9"]);
        assert_eq!(req.marker.as_deref(), Some("python_version < '3.8'"));

        let req = parse_requirement("flask ; sys_platform == 'win32'").unwrap();
        assert!(req.specifiers.is_empty());
        assert_eq!(req.marker.as_deref(), Some("sys_platform == 'win32'"));
    }

    #[test]
    fn test_per_requirement_options_dropped() {
        let req = parse_requirement("flask==0.9 --hash=sha256:abcdef --hash=sha256:012345").unwrap();
        assert_eq!(specs(&req), vec!["==0.9"]);
    }

    #[test]
    fn test_compatible_and_arbitrary() {
        let req = parse_requirement("flask~=0.9").unwrap();
        assert_eq!(req.specifiers[0].operator, Operator::Compatible);
        let req = parse_requirement("flask===foo").unwrap();
        assert_eq!(req.specifiers[0].operator, Operator::Arbitrary);
    }

    #[test]
    fn test_wildcard_version_kept_as_text() {
        let req = parse_requirement("flask==0.*").unwrap();
        assert_eq!(specs(&req), vec!["==0.*"]);
    }

    #[test]
    fn test_direct_reference_with_name() {
        let req = parse_requirement("pip @ https://github.com/pypa/pip/archive/1.3.1.zip").unwrap();
        assert_eq!(req.name, "pip");
        assert!(req.direct_reference);
        assert!(req.specifiers.is_empty());

        let req =
            parse_requirement("pip @ file:///tmp/pip.zip ; python_version >= '3'").unwrap();
        assert_eq!(req.marker.as_deref(), Some("python_version >= '3'"));
    }

    #[test]
    fn test_unnamed_url_with_egg() {
        let req = parse_requirement("git+https://github.com/org/repo.git#egg=mypkg").unwrap();
        assert_eq!(req.name, "mypkg");
        assert!(req.direct_reference);
    }

    #[test]
    fn test_unnamed_url_or_path_without_egg() {
        assert!(parse_requirement("https://example.com/pkg-1.0.tar.gz").is_none());
        assert!(parse_requirement("./local/pkg").is_none());
    }

    #[test]
    fn test_malformed() {
        assert!(parse_requirement("flask 0.9").is_none());
        assert!(parse_requirement("flask==").is_none());
        assert!(parse_requirement("flask=>1.0").is_none());
        assert!(parse_requirement("flask>=1.0,").is_none());
        assert!(parse_requirement("(>=1.0").is_none());
    }

    #[test]
    fn test_parse_specifiers_empty() {
        assert_eq!(parse_specifiers("").unwrap(), Vec::new());
        assert_eq!(parse_specifiers("()").unwrap(), Vec::new());
    }
}
