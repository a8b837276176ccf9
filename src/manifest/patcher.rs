//! In-place version token replacement
//!
//! Only the version token after `==` or `>=` changes; operators, whitespace,
//! extras, markers, hashes, comments and continuation backslashes stay as
//! they were written.

use crate::domain::{ConstraintSummary, Version};
use regex::Regex;

/// Rewrite the pinned or lower-bound version in `line` to `latest`.
///
/// The search starts after the package name (and extras) so a package whose
/// name looks like a version cannot be corrupted. If the old token cannot be
/// found the line is returned unchanged.
pub fn update_requirement_line(
    line: &str,
    package: &str,
    summary: &ConstraintSummary,
    latest: &Version,
) -> String {
    let Some(old) = summary.old_version() else {
        return line.to_string();
    };

    let start = spec_start(line, package);
    let (head, specs) = line.split_at(start);

    let pattern = format!(r"((?:==|>=)\s*){}", regex::escape(old.as_str()));
    let Ok(re) = Regex::new(&pattern) else {
        return line.to_string();
    };

    for caps in re.captures_iter(specs) {
        let (Some(whole), Some(prefix)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if specs[whole.end()..]
            .chars()
            .next()
            .is_some_and(is_version_char)
        {
            // `==1.0` inside `==1.0.5`
            continue;
        }
        return format!(
            "{}{}{}{}",
            head,
            &specs[..prefix.end()],
            latest,
            &specs[whole.end()..]
        );
    }

    line.to_string()
}

/// Pin an unconstrained requirement by inserting `==<latest>` after the
/// package name and extras.
pub fn pin_requirement_line(line: &str, package: &str, latest: &Version) -> String {
    let start = spec_start(line, package);
    let (head, tail) = line.split_at(start);
    format!("{}=={}{}", head, latest, tail)
}

/// Byte offset just past the package name, or past the extras' closing `]`
/// when an extras list directly follows the name.
fn spec_start(line: &str, package: &str) -> usize {
    let name_start = skip_layout(line, 0);
    let written_end = name_start + package.len();
    let name_end = match line.get(name_start..written_end) {
        Some(written)
            if written.eq_ignore_ascii_case(package)
                && !line[written_end..].starts_with(is_name_char) =>
        {
            written_end
        }
        _ => {
            name_start
                + line[name_start..]
                    .find(|c: char| !is_name_char(c))
                    .unwrap_or(line.len() - name_start)
        }
    };

    let after_name = skip_layout(line, name_end);
    if line[after_name..].starts_with('[') {
        if let Some(close) = line[after_name..].find(']') {
            return after_name + close + 1;
        }
    }
    name_end
}

/// Skip spaces, tabs and backslash continuations starting at `pos`.
fn skip_layout(line: &str, mut pos: usize) -> usize {
    let bytes = line.as_bytes();
    while pos < bytes.len() {
        match bytes[pos] {
            b' ' | b'\t' => pos += 1,
            b'\\' if bytes.get(pos + 1) == Some(&b'\n') => pos += 2,
            b'\\' if bytes.get(pos + 1) == Some(&b'\r') && bytes.get(pos + 2) == Some(&b'\n') => {
                pos += 3
            }
            _ => break,
        }
    }
    pos
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
}

fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '*' | '+' | '!' | '-' | '_')
}
