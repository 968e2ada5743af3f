//! Error types for wordusage-core.

use thiserror::Error;

use crate::diagnostic::Position;
use crate::tree::NodeKind;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while building the rule table or linting a document.
#[derive(Error, Debug)]
pub enum LintError {
    /// A node in the natural-language tree has no source position.
    ///
    /// Fails the whole document. `near` is the last position seen before
    /// the offending node, when there was one.
    #[error("malformed tree: {kind} node has no position{}", near.map(|p| format!(" (after {p})")).unwrap_or_default())]
    MalformedTree {
        /// Kind of the node that lacks a position.
        kind: NodeKind,
        /// Last known position before the node.
        near: Option<Position>,
    },

    /// The rule table is structurally invalid.
    #[error("invalid rule table{}: {reason}", rule.as_ref().map(|r| format!(" (rule `{r}`)")).unwrap_or_default())]
    InvalidRuleTable {
        /// Identifier of the offending rule, when known.
        rule: Option<String>,
        /// What is wrong with it.
        reason: String,
    },

    /// The rule table data is not valid JSON for the expected shape.
    #[error("failed to parse rule table: {0}")]
    RuleTableFormat(#[from] serde_json::Error),

    /// An `allow` entry names no rule in the table.
    ///
    /// Never raised; returned as a warning value by
    /// [`SuppressionSet::resolve`](crate::filter::SuppressionSet::resolve).
    #[error("unknown rule in allow list: `{id}`")]
    UnknownAllowId {
        /// The unrecognised entry.
        id: String,
    },
}

impl LintError {
    pub(crate) fn invalid_rule(rule: Option<&str>, reason: impl Into<String>) -> Self {
        Self::InvalidRuleTable {
            rule: rule.map(str::to_string),
            reason: reason.into(),
        }
    }
}

/// Result type alias using [`LintError`].
pub type LintResult<T> = Result<T, LintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_tree_mentions_last_position() {
        let err = LintError::MalformedTree {
            kind: NodeKind::Word,
            near: Some(Position::new(2, 5, 17)),
        };
        assert_eq!(err.to_string(), "malformed tree: word node has no position (after 2:5)");
    }

    #[test]
    fn invalid_rule_table_names_rule() {
        let err = LintError::invalid_rule(Some("his"), "empty pattern");
        assert_eq!(err.to_string(), "invalid rule table (rule `his`): empty pattern");

        let err = LintError::invalid_rule(None, "no rules");
        assert_eq!(err.to_string(), "invalid rule table: no rules");
    }
}
