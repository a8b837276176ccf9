//! Logical line reconstruction
//!
//! A physical line ending in a backslash continues onto the next one. Comment
//! lines never continue and terminate any pending continuation. Each logical
//! line keeps its original text so unchanged lines are written back byte for
//! byte.

use regex::Regex;
use std::str::SplitInclusive;
use std::sync::LazyLock;

static COMMENT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#").unwrap());

/// One requirement statement, possibly spanning several physical lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// 1-based number of the first physical line
    pub line_number: usize,
    /// Continuations merged, backslashes removed
    pub joined_text: String,
    /// Exact original text, including inner line terminators
    pub original_text: String,
    /// Terminator after the last physical line: `"\n"`, `"\r\n"` or `""`
    pub terminator: &'static str,
}

impl LogicalLine {
    /// Original text followed by its terminator
    pub fn to_raw(&self) -> String {
        format!("{}{}", self.original_text, self.terminator)
    }
}

/// Lazy iterator over the logical lines of a file
pub struct LogicalLines<'a> {
    physical: SplitInclusive<'a, char>,
    line_number: usize,
}

/// Iterate over the logical lines of `content`
pub fn logical_lines(content: &str) -> LogicalLines<'_> {
    LogicalLines {
        physical: content.split_inclusive('\n'),
        line_number: 0,
    }
}

fn split_terminator(raw: &str) -> (&str, &'static str) {
    if let Some(body) = raw.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, "\n")
    } else {
        (raw, "")
    }
}

impl Iterator for LogicalLines<'_> {
    type Item = LogicalLine;

    fn next(&mut self) -> Option<LogicalLine> {
        let mut joined = String::new();
        let mut original = String::new();
        let mut first_line = None;
        let mut last_terminator = "";

        for raw in self.physical.by_ref() {
            self.line_number += 1;
            let (body, terminator) = split_terminator(raw);
            let start = *first_line.get_or_insert(self.line_number);

            if start != self.line_number {
                original.push_str(last_terminator);
            }
            original.push_str(body);
            last_terminator = terminator;

            let is_comment = COMMENT_LINE_RE.is_match(body);
            match body.strip_suffix('\\') {
                Some(continued) if !is_comment => joined.push_str(continued),
                _ => {
                    if is_comment {
                        joined.push(' ');
                    }
                    joined.push_str(body);
                    return Some(LogicalLine {
                        line_number: start,
                        joined_text: joined,
                        original_text: original,
                        terminator,
                    });
                }
            }
        }

        // End of input inside a continuation
        first_line.map(|line_number| LogicalLine {
            line_number,
            joined_text: joined,
            original_text: original,
            terminator: last_terminator,
        })
    }
}
