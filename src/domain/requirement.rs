//! Requirement model for pip requirements files

use serde::Serialize;
use std::fmt;

/// Version comparison operator of a specifier clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `~=`
    Compatible,
    /// `===`
    Arbitrary,
}

impl Operator {
    /// Parse an operator token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Operator::Equal),
            "!=" => Some(Operator::NotEqual),
            ">" => Some(Operator::Greater),
            ">=" => Some(Operator::GreaterEqual),
            "<" => Some(Operator::Less),
            "<=" => Some(Operator::LessEqual),
            "~=" => Some(Operator::Compatible),
            "===" => Some(Operator::Arbitrary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Compatible => "~=",
            Operator::Arbitrary => "===",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `<operator><version>` clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Specifier {
    pub operator: Operator,
    /// Version text exactly as written
    pub version: String,
}

impl Specifier {
    pub fn new(operator: Operator, version: impl Into<String>) -> Self {
        Self {
            operator,
            version: version.into(),
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

/// A named requirement parsed from one logical line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    /// Package name as written in the file
    pub name: String,
    /// Extras listed in brackets after the name
    pub extras: Vec<String>,
    /// Version specifier clauses
    pub specifiers: Vec<Specifier>,
    /// Environment marker after `;`
    pub marker: Option<String>,
    /// True for `name @ url` and `url#egg=name` requirements
    pub direct_reference: bool,
}

impl Requirement {
    /// Creates a new requirement with no extras, specifiers or marker
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extras: Vec::new(),
            specifiers: Vec::new(),
            marker: None,
            direct_reference: false,
        }
    }

    pub fn with_specifier(mut self, operator: Operator, version: impl Into<String>) -> Self {
        self.specifiers.push(Specifier::new(operator, version));
        self
    }

    pub fn with_extras(mut self, extras: Vec<String>) -> Self {
        self.extras = extras;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    pub fn as_direct_reference(mut self) -> Self {
        self.direct_reference = true;
        self
    }

    /// PEP 503 normalized name
    pub fn canonical_name(&self) -> String {
        canonicalize_name(&self.name)
    }
}

/// Normalize a package name: lowercase, runs of `-`, `_` and `.` become `-`
pub fn canonicalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }
    out
}

/// Kind of include directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeKind {
    /// `-r` / `--requirement`
    Requirement,
    /// `-c` / `--constraint`
    Constraint,
}

/// Classification of a logical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Empty or whitespace only
    Blank,
    /// Only a comment
    Comment,
    /// Reference to another manifest
    Include { kind: IncludeKind, target: String },
    /// A named package requirement
    Requirement(Requirement),
    /// Pip options, editable installs, unnamed URLs and unparseable text
    Other,
}

impl ParsedLine {
    pub fn is_requirement(&self) -> bool {
        matches!(self, ParsedLine::Requirement(_))
    }
}
