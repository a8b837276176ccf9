//! Requirements file line parser
//!
//! Classifies one logical line of a pip requirements file:
//! - blank and comment-only lines
//! - include directives (`-r`, `--requirement`, `-c`, `--constraint`)
//! - other pip option lines, which are left alone
//! - named requirements with extras, specifiers, markers and per-line options

mod options;
mod requirement;

pub use options::parse_option_line;
pub use requirement::parse_requirement;

use crate::domain::ParsedLine;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// A `#` only starts a comment at the beginning of a line or after whitespace
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|\s+)#.*$").unwrap());

/// Remove a trailing comment from a line
pub fn strip_comment(line: &str) -> Cow<'_, str> {
    COMMENT_RE.replace(line, "")
}

/// Classify a joined logical line
pub fn parse_line(line: &str) -> ParsedLine {
    let stripped = strip_comment(line);
    let text = stripped.trim();

    if text.is_empty() {
        return if line.trim().is_empty() {
            ParsedLine::Blank
        } else {
            ParsedLine::Comment
        };
    }

    if text.starts_with('-') {
        return parse_option_line(text);
    }

    match parse_requirement(text) {
        Some(requirement) => ParsedLine::Requirement(requirement),
        None => ParsedLine::Other,
    }
}
