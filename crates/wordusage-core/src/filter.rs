//! Suppression of diagnostics.
//!
//! Two independent mechanisms drop diagnostics:
//!
//! - an allow list ([`SuppressionSet`]) from configuration, matched on
//!   rule id;
//! - an external [`SuppressionOracle`], typically inline directive
//!   comments, consulted per diagnostic.
//!
//! Allow lists only grow when scopes merge. A more specific scope can
//! allow more rules but can never take an allowance away.

use std::collections::BTreeSet;

use crate::diagnostic::{Diagnostic, Position};
use crate::error::LintError;
use crate::rules::RuleTable;

/// Rule ids the user explicitly permits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionSet {
    allow: BTreeSet<String>,
}

impl SuppressionSet {
    /// An empty set; nothing is allowed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if diagnostics for this rule id are dropped.
    pub fn allows(&self, rule_id: &str) -> bool {
        self.allow.contains(rule_id)
    }

    /// Number of allowed ids.
    pub fn len(&self) -> usize {
        self.allow.len()
    }

    /// Returns `true` if nothing is allowed.
    pub fn is_empty(&self) -> bool {
        self.allow.is_empty()
    }

    /// Allowed ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.allow.iter().map(String::as_str)
    }

    /// Union of a parent scope and a more specific child scope.
    #[must_use]
    pub fn merged(&self, child: &Self) -> Self {
        Self {
            allow: self.allow.union(&child.allow).cloned().collect(),
        }
    }

    /// Maps entries onto rule ids of `table`.
    ///
    /// An entry that is a rule id is kept. An entry that spells one of a
    /// rule's patterns (say `utilizing`) is replaced by that rule's id.
    /// Anything else is dropped and reported as
    /// [`LintError::UnknownAllowId`]; callers should surface these as
    /// warnings and carry on.
    pub fn resolve(&self, table: &RuleTable) -> (Self, Vec<LintError>) {
        let mut resolved = BTreeSet::new();
        let mut unknown = Vec::new();

        for entry in &self.allow {
            if table.index_of(entry).is_some() {
                resolved.insert(entry.clone());
            } else if let Some(rule) = table.by_phrase(entry) {
                resolved.insert(rule.id.clone());
            } else {
                unknown.push(LintError::UnknownAllowId { id: entry.clone() });
            }
        }

        (Self { allow: resolved }, unknown)
    }
}

impl<S: Into<String>> FromIterator<S> for SuppressionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            allow: iter
                .into_iter()
                .map(Into::into)
                .map(|s: String| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

/// Capability to suppress a rule at a position, supplied from outside
/// the matcher (directive comments, editor state, ...).
pub trait SuppressionOracle {
    /// Returns `true` if `rule_id` is switched off at `position`.
    fn is_suppressed(&self, rule_id: &str, position: Position) -> bool;
}

/// Oracle that never suppresses anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuppression;

impl SuppressionOracle for NoSuppression {
    fn is_suppressed(&self, _rule_id: &str, _position: Position) -> bool {
        false
    }
}

/// Drops diagnostics whose rule id is allowed. Order is preserved.
pub fn filter(diagnostics: Vec<Diagnostic>, allow: &SuppressionSet) -> Vec<Diagnostic> {
    if allow.is_empty() {
        return diagnostics;
    }
    diagnostics
        .into_iter()
        .filter(|d| !allow.allows(&d.rule_id))
        .collect()
}

/// Drops diagnostics the oracle reports as suppressed at their start.
pub fn suppress(
    diagnostics: Vec<Diagnostic>,
    oracle: &dyn SuppressionOracle,
) -> Vec<Diagnostic> {
    diagnostics
        .into_iter()
        .filter(|d| !oracle.is_suppressed(&d.rule_id, d.start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{SOURCE, Severity};
    use crate::rules::RuleSpec;

    fn diag(rule_id: &str, line: usize) -> Diagnostic {
        Diagnostic {
            rule_id: rule_id.to_string(),
            message: format!("{rule_id} message"),
            start: Position::new(line, 1, 0),
            end: Position::new(line, 4, 3),
            severity: Severity::Warning,
            fatal: false,
            source: SOURCE.to_string(),
            actual: rule_id.to_string(),
            expected: Vec::new(),
            rule_index: 0,
        }
    }

    #[test]
    fn allowed_rule_is_removed() {
        let allow: SuppressionSet = ["his"].into_iter().collect();
        let out = filter(vec![diag("his", 1)], &allow);
        assert!(out.is_empty());
    }

    #[test]
    fn filter_removes_exactly_allowed_ids_in_order() {
        let input = vec![diag("his", 1), diag("just", 2), diag("her", 3), diag("his", 4)];
        let allow: SuppressionSet = ["his", "whitelist"].into_iter().collect();
        let out = filter(input.clone(), &allow);

        let expected: Vec<_> = input.into_iter().filter(|d| d.rule_id != "his").collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn filter_is_idempotent() {
        let input = vec![diag("his", 1), diag("just", 2), diag("her", 3)];
        let allow: SuppressionSet = ["just"].into_iter().collect();
        let once = filter(input, &allow);
        let twice = filter(once.clone(), &allow);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_allow_keeps_everything() {
        let input = vec![diag("his", 1)];
        assert_eq!(filter(input.clone(), &SuppressionSet::new()), input);
    }

    #[test]
    fn merge_is_a_union() {
        let parent: SuppressionSet = ["his"].into_iter().collect();
        let child: SuppressionSet = ["her", "his"].into_iter().collect();
        let merged = parent.merged(&child);
        assert_eq!(merged.iter().collect::<Vec<_>>(), vec!["her", "his"]);
        assert!(merged.allows("his"));
    }

    #[test]
    fn child_cannot_remove_parent_allowance() {
        let parent: SuppressionSet = ["his"].into_iter().collect();
        let merged = parent.merged(&SuppressionSet::new());
        assert!(merged.allows("his"));
    }

    #[test]
    fn blank_entries_ignored() {
        let set: SuppressionSet = ["", "  his  "].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert!(set.allows("his"));
    }

    #[test]
    fn resolve_maps_phrases_and_reports_unknowns() {
        let table = RuleTable::from_specs(vec![
            RuleSpec::new("his", "m"),
            RuleSpec::new("utilize", "m").with_variants(&["utilizing"]),
        ])
        .unwrap();
        let allow: SuppressionSet = ["his", "Utilizing", "nope"].into_iter().collect();

        let (resolved, unknown) = allow.resolve(&table);
        assert_eq!(resolved.iter().collect::<Vec<_>>(), vec!["his", "utilize"]);
        assert_eq!(unknown.len(), 1);
        assert!(matches!(&unknown[0], LintError::UnknownAllowId { id } if id == "nope"));
    }

    struct LineOracle(usize);

    impl SuppressionOracle for LineOracle {
        fn is_suppressed(&self, rule_id: &str, position: Position) -> bool {
            rule_id == "his" && position.line == self.0
        }
    }

    #[test]
    fn oracle_drops_flagged_diagnostics() {
        let out = suppress(vec![diag("his", 1), diag("his", 2), diag("her", 2)], &LineOracle(2));
        let lines: Vec<_> = out.iter().map(|d| (d.rule_id.as_str(), d.start.line)).collect();
        assert_eq!(lines, vec![("his", 1), ("her", 2)]);
    }

    #[test]
    fn no_suppression_keeps_everything() {
        let input = vec![diag("his", 1)];
        assert_eq!(suppress(input.clone(), &NoSuppression), input);
    }
}
