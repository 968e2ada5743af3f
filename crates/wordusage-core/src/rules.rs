//! Rule table.
//!
//! Each rule maps one or more word patterns (a canonical phrase plus
//! inflected variants) to a diagnostic template. The table is validated
//! once, up front: an empty pattern, a duplicate id or a missing message
//! rejects the whole table before any document is read.
//!
//! The bundled table lives in `data/rules.json`:
//!
//! ```json
//! [
//!   { "pattern": "his", "message": "`his` may be insensitive, use `their`, `theirs` instead",
//!     "suggestions": ["their", "theirs"] },
//!   { "id": "utilize", "pattern": "utilize", "variants": ["utilizes", "utilizing"],
//!     "message": "Use `use` instead of `utilize`", "suggestions": ["use"] }
//! ]
//! ```
//!
//! `pattern` is either a phrase or an array of words. `id` defaults to the
//! pattern words joined with `-` (`in-order-to`) and `severity` to
//! `warning`. Ids never contain white space, so directive comments can
//! list them separated by spaces.

use std::collections::HashMap;

use serde::Deserialize;

use crate::diagnostic::Severity;
use crate::error::{LintError, LintResult};

/// The bundled rule data.
const BUILTIN_RULES: &str = include_str!("../data/rules.json");

/// How a pattern is written in rule data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatternSource {
    /// A phrase, split on white space.
    Phrase(String),
    /// Words in order.
    Words(Vec<String>),
}

impl PatternSource {
    fn words(&self) -> Vec<String> {
        match self {
            Self::Phrase(phrase) => normalize_phrase(phrase),
            Self::Words(words) => words.iter().flat_map(|w| normalize_phrase(w)).collect(),
        }
    }
}

/// One entry of rule data, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    /// Rule identifier. Defaults to the pattern words joined with `-`.
    #[serde(default)]
    pub id: Option<String>,
    /// The canonical pattern.
    pub pattern: PatternSource,
    /// Inflected forms of the pattern, matched under the same rule.
    #[serde(default)]
    pub variants: Vec<String>,
    /// Diagnostic message.
    #[serde(default)]
    pub message: Option<String>,
    /// Suggested replacements.
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Default severity.
    #[serde(default)]
    pub severity: Severity,
}

impl RuleSpec {
    /// A warning rule for `phrase` with the given message.
    pub fn new(phrase: &str, message: &str) -> Self {
        Self {
            id: None,
            pattern: PatternSource::Phrase(phrase.to_string()),
            variants: Vec::new(),
            message: Some(message.to_string()),
            suggestions: Vec::new(),
            severity: Severity::Warning,
        }
    }

    /// Sets an explicit id.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Adds inflected variants.
    #[must_use]
    pub fn with_variants(mut self, variants: &[&str]) -> Self {
        self.variants = variants.iter().map(|v| (*v).to_string()).collect();
        self
    }

    /// Sets suggested replacements.
    #[must_use]
    pub fn with_suggestions(mut self, suggestions: &[&str]) -> Self {
        self.suggestions = suggestions.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Sets the severity.
    #[must_use]
    pub const fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// A validated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Unique identifier.
    pub id: String,
    /// Patterns, canonical first. Each is a non-empty run of lowercase words.
    pub patterns: Vec<Vec<String>>,
    /// Diagnostic message.
    pub message: String,
    /// Suggested replacements.
    pub suggestions: Vec<String>,
    /// Default severity.
    pub severity: Severity,
}

impl Rule {
    /// The canonical pattern as a space-joined phrase.
    pub fn phrase(&self) -> String {
        self.patterns
            .first()
            .map(|words| words.join(" "))
            .unwrap_or_default()
    }
}

/// Immutable, validated set of rules in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
    by_id: HashMap<String, usize>,
    by_phrase: HashMap<String, usize>,
}

impl RuleTable {
    /// Validates rule data and builds a table.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::InvalidRuleTable`] for an empty pattern or
    /// variant, a duplicate id, or a missing or blank message.
    pub fn from_specs(specs: Vec<RuleSpec>) -> LintResult<Self> {
        let mut table = Self::default();

        for spec in specs {
            let words = spec.pattern.words();
            let id = spec
                .id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map_or_else(|| words.join("-"), str::to_string);

            if words.is_empty() {
                let named = spec.id.as_deref().filter(|id| !id.trim().is_empty());
                return Err(LintError::invalid_rule(named, "empty pattern"));
            }

            if id.contains(char::is_whitespace) {
                return Err(LintError::invalid_rule(Some(&id), "id contains white space"));
            }

            let message = match spec.message {
                Some(ref m) if !m.trim().is_empty() => m.clone(),
                _ => return Err(LintError::invalid_rule(Some(&id), "missing message")),
            };

            let mut patterns = vec![words];
            for variant in &spec.variants {
                let variant_words = normalize_phrase(variant);
                if variant_words.is_empty() {
                    return Err(LintError::invalid_rule(Some(&id), "empty variant"));
                }
                if !patterns.contains(&variant_words) {
                    patterns.push(variant_words);
                }
            }

            let index = table.rules.len();
            if table.by_id.insert(id.clone(), index).is_some() {
                return Err(LintError::invalid_rule(Some(&id), "duplicate id"));
            }
            for pattern in &patterns {
                table.by_phrase.entry(pattern.join(" ")).or_insert(index);
            }

            table.rules.push(Rule {
                id,
                patterns,
                message,
                suggestions: spec.suggestions,
                severity: spec.severity,
            });
        }

        tracing::debug!(rules = table.rules.len(), "rule table built");
        Ok(table)
    }

    /// Parses and validates a JSON array of rule entries.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::RuleTableFormat`] for malformed JSON and
    /// [`LintError::InvalidRuleTable`] for invalid entries.
    pub fn from_json(json: &str) -> LintResult<Self> {
        let specs: Vec<RuleSpec> = serde_json::from_str(json)?;
        Self::from_specs(specs)
    }

    /// Loads the bundled rule table.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled data is broken.
    pub fn builtin() -> LintResult<Self> {
        Self::from_json(BUILTIN_RULES)
    }

    /// All rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule at a declaration index.
    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    /// Declaration index of the rule with this id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Rule with this id.
    pub fn by_id(&self, id: &str) -> Option<&Rule> {
        self.index_of(id).map(|i| &self.rules[i])
    }

    /// First-declared rule owning this phrase (canonical or variant).
    ///
    /// The phrase is normalized the same way patterns are.
    pub fn by_phrase(&self, phrase: &str) -> Option<&Rule> {
        let key = normalize_phrase(phrase).join(" ");
        self.by_phrase.get(&key).map(|&i| &self.rules[i])
    }
}

/// Lowercase words of a phrase.
fn normalize_phrase(phrase: &str) -> Vec<String> {
    phrase.split_whitespace().map(str::to_lowercase).collect()
}
