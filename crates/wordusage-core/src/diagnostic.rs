//! Positions, severities and the diagnostic record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name every diagnostic is reported under.
///
/// Directive comments (`<!-- wordusage disable ... -->`) use the same tag.
pub const SOURCE: &str = "wordusage";

/// A point in the source text.
///
/// `line` and `column` are 1-based, with columns counted in characters.
/// `offset` is the 0-based byte offset into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based, in characters).
    pub column: usize,
    /// Byte offset (0-based).
    pub offset: usize,
}

impl Position {
    /// Creates a new position.
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Ordering key: line, then column, then offset.
    pub const fn sort_key(&self) -> (usize, usize, usize) {
        (self.line, self.column, self.offset)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Severity {
    /// Worth reviewing (default).
    #[default]
    Warning,
    /// Must be fixed; marks the diagnostic fatal.
    Error,
}

impl Severity {
    /// Returns the severity as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported word-usage issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Identifier of the rule that fired.
    pub rule_id: String,
    /// Human-readable reason.
    pub message: String,
    /// Start of the matched span (inclusive).
    pub start: Position,
    /// End of the matched span (exclusive).
    pub end: Position,
    /// Effective severity after overrides.
    pub severity: Severity,
    /// `true` when the severity is [`Severity::Error`].
    pub fatal: bool,
    /// Reporting source tag, always [`SOURCE`].
    pub source: String,
    /// The matched text as written in the source.
    pub actual: String,
    /// Suggested replacements, possibly empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected: Vec<String>,
    /// Declaration index of the rule in its table, used for ordering.
    #[serde(skip)]
    pub rule_index: usize,
}

impl Diagnostic {
    /// `line:column-line:column` label for the span.
    pub fn span_label(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span_label(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_displays_line_and_column() {
        assert_eq!(Position::new(3, 14, 40).to_string(), "3:14");
    }

    #[test]
    fn severity_defaults_to_warning() {
        assert_eq!(Severity::default(), Severity::Warning);
        assert_eq!(Severity::Error.as_str(), "error");
    }

    #[test]
    fn severity_deserializes_lowercase() {
        let s: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(s, Severity::Error);
    }
}
