//! Lint execution engine.
//!
//! Ties the pipeline together: tree → tokens → matches → diagnostics →
//! allow filter → directive filter → sorted output. A [`Linter`] holds
//! only immutable state, so one instance can check many documents from
//! many threads.

use std::collections::HashMap;
use std::sync::Arc;

use crate::diagnostic::{Diagnostic, SOURCE, Severity};
use crate::directives;
use crate::error::{LintError, LintResult};
use crate::filter::{self, NoSuppression, SuppressionOracle, SuppressionSet};
use crate::matcher::Matcher;
use crate::prose::{self, SourceFormat};
use crate::sink::DiagnosticSink;
use crate::stream;
use crate::tree::Node;

/// Per-run options.
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    /// Rule ids (or pattern phrases) never to report.
    pub allow: SuppressionSet,
    /// Severity per rule id, replacing the rule's own.
    pub severity_overrides: HashMap<String, Severity>,
}

impl LintOptions {
    /// Options that allow the given ids.
    pub fn allowing<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allow: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Adds a severity override.
    #[must_use]
    pub fn with_severity(mut self, rule_id: impl Into<String>, severity: Severity) -> Self {
        self.severity_overrides.insert(rule_id.into(), severity);
        self
    }
}

/// Checks documents against a shared matcher.
#[derive(Debug)]
pub struct Linter {
    matcher: Arc<Matcher>,
    options: LintOptions,
    warnings: Vec<LintError>,
}

impl Linter {
    /// Creates a linter, resolving allow entries against the rule table.
    ///
    /// Entries that name no rule are kept out of the options and exposed
    /// through [`Linter::warnings`].
    pub fn new(matcher: Arc<Matcher>, options: LintOptions) -> Self {
        let table = matcher.table();
        let (allow, mut warnings) = options.allow.resolve(table);

        let mut severity_overrides = HashMap::with_capacity(options.severity_overrides.len());
        for (key, severity) in options.severity_overrides {
            let id = table
                .by_id(&key)
                .or_else(|| table.by_phrase(&key))
                .map(|rule| rule.id.clone());
            match id {
                Some(id) => {
                    severity_overrides.insert(id, severity);
                }
                None => warnings.push(LintError::UnknownAllowId { id: key }),
            }
        }

        for warning in &warnings {
            tracing::warn!(%warning, "ignoring configuration entry");
        }

        Self {
            matcher,
            options: LintOptions {
                allow,
                severity_overrides,
            },
            warnings,
        }
    }

    /// The shared matcher.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Effective options after resolution.
    pub const fn options(&self) -> &LintOptions {
        &self.options
    }

    /// Configuration entries that named no rule.
    pub fn warnings(&self) -> &[LintError] {
        &self.warnings
    }

    /// Checks an already-built tree.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::MalformedTree`] if a token node lacks a position.
    #[tracing::instrument(skip_all)]
    pub fn check_tree(
        &self,
        root: &Node,
        oracle: &dyn SuppressionOracle,
    ) -> LintResult<Vec<Diagnostic>> {
        let tokens = stream::tokenize_tree(root)?;
        let matches = self.matcher.find(&tokens);
        tracing::debug!(tokens = tokens.len(), matches = matches.len(), "matched");

        let diagnostics = matches
            .iter()
            .map(|hit| {
                let severity = self
                    .options
                    .severity_overrides
                    .get(&hit.rule.id)
                    .copied()
                    .unwrap_or(hit.rule.severity);
                Diagnostic {
                    rule_id: hit.rule.id.clone(),
                    message: hit.rule.message.clone(),
                    start: hit.start,
                    end: hit.end,
                    severity,
                    fatal: severity == Severity::Error,
                    source: SOURCE.to_string(),
                    actual: hit.actual(&tokens),
                    expected: hit.rule.suggestions.clone(),
                    rule_index: hit.rule_index,
                }
            })
            .collect();

        let diagnostics = filter::filter(diagnostics, &self.options.allow);
        let diagnostics = filter::suppress(diagnostics, oracle);

        let mut sink = DiagnosticSink::new();
        sink.extend(diagnostics);
        Ok(sink.finish())
    }

    /// Builds a tree from `source` and checks it.
    ///
    /// Markdown input also honours `<!-- wordusage ... -->` directives
    /// outside code.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Linter::check_tree`].
    #[tracing::instrument(skip_all, fields(input_len = source.len(), ?format))]
    pub fn check_source(&self, source: &str, format: SourceFormat) -> LintResult<Vec<Diagnostic>> {
        let root = prose::parse(source, format);
        match format {
            SourceFormat::Markdown => {
                let directives = directives::parse_directives(source);
                if directives.is_empty() {
                    self.check_tree(&root, &NoSuppression)
                } else {
                    self.check_tree(&root, &directives)
                }
            }
            SourceFormat::Text => self.check_tree(&root, &NoSuppression),
        }
    }
}
