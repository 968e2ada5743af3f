//! Ordered, de-duplicated collection of diagnostics.

use crate::diagnostic::Diagnostic;

/// Accumulates diagnostics from one or more passes over a document.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Number of diagnostics collected so far, duplicates included.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns `true` if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Sorted view with duplicates removed.
    ///
    /// Ordered by start line, column and offset, then rule declaration
    /// order, then end offset. Of several diagnostics sharing start, end
    /// and rule id only the first pushed survives.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by_key(|d| (d.start.sort_key(), d.rule_index, d.end.offset));
        self.diagnostics
            .dedup_by(|b, a| a.start == b.start && a.end == b.end && a.rule_id == b.rule_id);
        self.diagnostics
    }
}

impl Extend<Diagnostic> for DiagnosticSink {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Position, SOURCE, Severity};

    fn diag(rule_id: &str, rule_index: usize, line: usize, column: usize) -> Diagnostic {
        let offset = (line - 1) * 100 + column - 1;
        Diagnostic {
            rule_id: rule_id.to_string(),
            message: String::new(),
            start: Position::new(line, column, offset),
            end: Position::new(line, column + 3, offset + 3),
            severity: Severity::Warning,
            fatal: false,
            source: SOURCE.to_string(),
            actual: String::new(),
            expected: Vec::new(),
            rule_index,
        }
    }

    fn order(diagnostics: &[Diagnostic]) -> Vec<(usize, usize, &str)> {
        diagnostics
            .iter()
            .map(|d| (d.start.line, d.start.column, d.rule_id.as_str()))
            .collect()
    }

    #[test]
    fn empty_sink_finishes_empty() {
        assert!(DiagnosticSink::new().finish().is_empty());
    }

    #[test]
    fn sorts_by_position() {
        let mut sink = DiagnosticSink::new();
        sink.push(diag("b", 1, 2, 1));
        sink.push(diag("a", 0, 1, 9));
        sink.push(diag("c", 2, 1, 2));
        assert_eq!(order(&sink.finish()), vec![(1, 2, "c"), (1, 9, "a"), (2, 1, "b")]);
    }

    #[test]
    fn ties_follow_declaration_order() {
        let mut sink = DiagnosticSink::new();
        sink.extend([diag("late", 5, 1, 1), diag("early", 1, 1, 1)]);
        assert_eq!(order(&sink.finish()), vec![(1, 1, "early"), (1, 1, "late")]);
    }

    #[test]
    fn duplicates_from_separate_passes_collapse() {
        let mut sink = DiagnosticSink::new();
        sink.extend([diag("his", 0, 1, 1), diag("her", 1, 3, 1)]);
        sink.extend([diag("his", 0, 1, 1)]);
        assert_eq!(sink.len(), 3);
        assert_eq!(order(&sink.finish()), vec![(1, 1, "his"), (3, 1, "her")]);
    }

    #[test]
    fn same_position_different_rules_both_survive() {
        let mut sink = DiagnosticSink::new();
        sink.extend([diag("a", 0, 1, 1), diag("b", 1, 1, 1)]);
        assert_eq!(sink.finish().len(), 2);
    }
}
