//! Pip option lines

use crate::domain::{IncludeKind, ParsedLine};

const INCLUDE_FLAGS: [(&str, IncludeKind); 4] = [
    ("--requirement", IncludeKind::Requirement),
    ("--constraint", IncludeKind::Constraint),
    ("-r", IncludeKind::Requirement),
    ("-c", IncludeKind::Constraint),
];

/// Parse a line starting with `-`.
///
/// Include directives accept the value after whitespace or `=`, and the short
/// flags also accept it attached (`-rbase.txt`). Every other option is
/// returned as [`ParsedLine::Other`].
pub fn parse_option_line(line: &str) -> ParsedLine {
    let line = line.trim();

    for (flag, kind) in INCLUDE_FLAGS {
        let Some(rest) = line.strip_prefix(flag) else {
            continue;
        };

        let value = if let Some(value) = rest.strip_prefix('=') {
            value
        } else if rest.starts_with(char::is_whitespace) || flag.len() == 2 {
            rest
        } else {
            // e.g. `--requirements-file`, not ours
            continue;
        };

        let target = unquote(value.trim());
        if target.is_empty() {
            return ParsedLine::Other;
        }
        return ParsedLine::Include {
            kind,
            target: target.to_string(),
        };
    }

    ParsedLine::Other
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
